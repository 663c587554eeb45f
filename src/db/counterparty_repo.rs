// src/db/counterparty_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::account_repo::contains_pattern,
    models::counterparty::{Counterparty, CounterpartyFilter, CounterpartyKind},
};

#[async_trait]
pub trait CounterpartyStore: Send + Sync {
    async fn list(&self, user_id: Uuid, filter: &CounterpartyFilter) -> Result<Vec<Counterparty>, AppError>;
    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Counterparty>, AppError>;
    async fn insert(&self, counterparty: &Counterparty) -> Result<Counterparty, AppError>;
    async fn save(&self, counterparty: &Counterparty) -> Result<Option<Counterparty>, AppError>;
}

#[derive(Clone)]
pub struct PgCounterpartyRepository {
    pool: PgPool,
}

impl PgCounterpartyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CounterpartyStore for PgCounterpartyRepository {
    async fn list(&self, user_id: Uuid, filter: &CounterpartyFilter) -> Result<Vec<Counterparty>, AppError> {
        let mut query =
            QueryBuilder::<Postgres>::new("SELECT * FROM clientes_fornecedores WHERE user_id = ");
        query.push_bind(user_id);

        if let Some(tipo) = filter.tipo {
            query.push(" AND tipo = ").push_bind(tipo);
        }
        if let Some(tipo_conta) = filter.para_conta {
            let [especifico, ambos] = CounterpartyKind::compatible_kinds(tipo_conta);
            query
                .push(" AND tipo IN (")
                .push_bind(especifico)
                .push(", ")
                .push_bind(ambos)
                .push(")");
        }
        if let Some(ativo) = filter.ativo {
            query.push(" AND ativo = ").push_bind(ativo);
        }
        if let Some(termo) = filter.busca.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            query
                .push(" AND nome ILIKE ")
                .push_bind(contains_pattern(termo))
                .push(r" ESCAPE '\'");
        }

        query.push(" ORDER BY nome ASC");

        let counterparties = query
            .build_query_as::<Counterparty>()
            .fetch_all(&self.pool)
            .await?;

        Ok(counterparties)
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Counterparty>, AppError> {
        let counterparty = sqlx::query_as::<_, Counterparty>(
            "SELECT * FROM clientes_fornecedores WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(counterparty)
    }

    async fn insert(&self, c: &Counterparty) -> Result<Counterparty, AppError> {
        let created = sqlx::query_as::<_, Counterparty>(
            r#"
            INSERT INTO clientes_fornecedores (
                id, user_id, nome, tipo, documento, email, telefone,
                endereco, observacoes, ativo, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(c.id)
        .bind(c.user_id)
        .bind(&c.nome)
        .bind(c.tipo)
        .bind(&c.documento)
        .bind(&c.email)
        .bind(&c.telefone)
        .bind(&c.endereco)
        .bind(&c.observacoes)
        .bind(c.ativo)
        .bind(c.created_at)
        .bind(c.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn save(&self, c: &Counterparty) -> Result<Option<Counterparty>, AppError> {
        let updated = sqlx::query_as::<_, Counterparty>(
            r#"
            UPDATE clientes_fornecedores SET
                nome = $3, tipo = $4, documento = $5, email = $6, telefone = $7,
                endereco = $8, observacoes = $9, ativo = $10, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(c.id)
        .bind(c.user_id)
        .bind(&c.nome)
        .bind(c.tipo)
        .bind(&c.documento)
        .bind(&c.email)
        .bind(&c.telefone)
        .bind(&c.endereco)
        .bind(&c.observacoes)
        .bind(c.ativo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }
}
