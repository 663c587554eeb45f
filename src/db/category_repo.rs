// src/db/category_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::category::Category};

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn insert(&self, category: &Category) -> Result<Category, AppError>;
    async fn list(&self, user_id: Uuid) -> Result<Vec<Category>, AppError>;
    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Category>, AppError>;
}

#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryRepository {
    async fn insert(&self, c: &Category) -> Result<Category, AppError> {
        let created = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categorias (id, user_id, nome, tipo, cor, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(c.id)
        .bind(c.user_id)
        .bind(&c.nome)
        .bind(c.tipo)
        .bind(&c.cor)
        .bind(c.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categorias WHERE user_id = $1 ORDER BY nome ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT * FROM categorias WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }
}
