// src/services/category_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::CategoryStore,
    models::category::{Category, NewCategory},
};

#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryStore>) -> Self {
        Self { categories }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Category>, AppError> {
        self.categories.list(user_id).await
    }

    pub async fn create(&self, user_id: Uuid, payload: NewCategory) -> Result<Category, AppError> {
        payload.validate()?;
        if payload.nome.trim().is_empty() {
            return Err(AppError::invalid_field("nome", "required", "O nome é obrigatório."));
        }

        let category = Category {
            id: Uuid::new_v4(),
            user_id,
            nome: payload.nome.trim().to_string(),
            tipo: payload.tipo,
            cor: payload.cor,
            created_at: Utc::now(),
        };

        let created = self.categories.insert(&category).await?;
        tracing::info!(categoria_id = %created.id, "Categoria criada");
        Ok(created)
    }
}
