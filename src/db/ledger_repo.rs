// src/db/ledger_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::ledger::{LedgerFilter, LedgerTransaction},
};

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn insert(&self, transacao: &LedgerTransaction) -> Result<LedgerTransaction, AppError>;
    async fn list(&self, user_id: Uuid, filter: &LedgerFilter) -> Result<Vec<LedgerTransaction>, AppError>;
}

#[derive(Clone)]
pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for PgLedgerRepository {
    async fn insert(&self, t: &LedgerTransaction) -> Result<LedgerTransaction, AppError> {
        let created = sqlx::query_as::<_, LedgerTransaction>(
            r#"
            INSERT INTO transacoes (
                id, "userId", category_id, estabelecimento, valor, detalhes, tipo, quando, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(t.id)
        .bind(t.user_id)
        .bind(t.category_id)
        .bind(&t.estabelecimento)
        .bind(t.valor)
        .bind(&t.detalhes)
        .bind(t.tipo)
        .bind(t.quando)
        .bind(t.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list(&self, user_id: Uuid, filter: &LedgerFilter) -> Result<Vec<LedgerTransaction>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(r#"SELECT * FROM transacoes WHERE "userId" = "#);
        query.push_bind(user_id);

        if let Some(tipo) = filter.tipo {
            query.push(" AND tipo = ").push_bind(tipo);
        }
        if let Some(de) = filter.de {
            query.push(" AND quando >= ").push_bind(de);
        }
        if let Some(ate) = filter.ate {
            query.push(" AND quando <= ").push_bind(ate);
        }
        if let Some(category_id) = filter.category_id {
            query.push(" AND category_id = ").push_bind(category_id);
        }

        query.push(" ORDER BY quando DESC, created_at DESC");

        let transacoes = query
            .build_query_as::<LedgerTransaction>()
            .fetch_all(&self.pool)
            .await?;

        Ok(transacoes)
    }
}
