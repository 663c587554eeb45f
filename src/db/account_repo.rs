// src/db/account_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::{AppError, Resource},
    models::account::{Account, AccountFilter, AccountStatus},
};

/// Dados gravados por um pagamento. `expected_paid` é o `valor_pago` lido
/// antes do cálculo; a gravação só acontece se ele ainda for o atual.
#[derive(Debug, Clone, Copy)]
pub struct PaymentRecord {
    pub expected_paid: Decimal,
    pub valor_pago: Decimal,
    pub status: AccountStatus,
    pub data_pagamento: NaiveDate,
}

/// Acesso às contas a pagar/receber. Toda operação é escopada pelo dono.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &AccountFilter,
        today: NaiveDate,
    ) -> Result<Vec<Account>, AppError>;

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Account>, AppError>;

    async fn insert(&self, account: &Account) -> Result<Account, AppError>;

    /// Grava os campos editáveis (nunca `valor_pago` nem `data_pagamento`).
    /// Só grava se `valor_pago` ainda for o de `account`; `None` se a conta
    /// não existe para esse usuário ou se recebeu pagamento desde a leitura.
    async fn save(&self, account: &Account) -> Result<Option<Account>, AppError>;

    /// `save` que separa os dois casos de `None`: conta que sumiu vira
    /// `NotFound`, conta paga no meio do caminho vira `Conflict`.
    async fn save_checked(&self, account: &Account) -> Result<Account, AppError> {
        if let Some(saved) = self.save(account).await? {
            return Ok(saved);
        }
        match self.find(account.user_id, account.id).await? {
            Some(_) => {
                tracing::warn!(conta_id = %account.id, "Conta alterada por pagamento concorrente");
                Err(AppError::Conflict)
            }
            None => Err(AppError::NotFound(Resource::Conta)),
        }
    }

    /// `None` se a conta não existe ou se `valor_pago` mudou desde a leitura.
    async fn record_payment(
        &self,
        user_id: Uuid,
        id: Uuid,
        record: PaymentRecord,
    ) -> Result<Option<Account>, AppError>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}

/// Padrão `ILIKE` de "contém", com `%`, `_` e `\` do termo tratados como
/// literais (usar com `ESCAPE '\'`).
pub fn contains_pattern(termo: &str) -> String {
    let mut pattern = String::with_capacity(termo.len() + 2);
    pattern.push('%');
    for c in termo.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountRepository {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &AccountFilter,
        today: NaiveDate,
    ) -> Result<Vec<Account>, AppError> {
        let mut query =
            QueryBuilder::<Postgres>::new("SELECT * FROM contas_pagar_receber WHERE user_id = ");
        query.push_bind(user_id);

        if let Some(tipo) = filter.tipo {
            query.push(" AND tipo = ").push_bind(tipo);
        }

        // O status filtrado é o exibido: "vencido" e "pendente" dependem da data
        if let Some(status) = filter.status {
            match status {
                AccountStatus::Vencido => {
                    query
                        .push(" AND status NOT IN ('pago', 'cancelado') AND data_vencimento < ")
                        .push_bind(today);
                }
                AccountStatus::Pendente | AccountStatus::ParcialmentePago => {
                    query
                        .push(" AND status = ")
                        .push_bind(status)
                        .push(" AND data_vencimento >= ")
                        .push_bind(today);
                }
                AccountStatus::Pago | AccountStatus::Cancelado => {
                    query.push(" AND status = ").push_bind(status);
                }
            }
        }

        if let Some(de) = filter.de {
            query.push(" AND data_vencimento >= ").push_bind(de);
        }
        if let Some(ate) = filter.ate {
            query.push(" AND data_vencimento <= ").push_bind(ate);
        }
        if let Some(category_id) = filter.category_id {
            query.push(" AND category_id = ").push_bind(category_id);
        }
        if let Some(cliente_fornecedor_id) = filter.cliente_fornecedor_id {
            query
                .push(" AND cliente_fornecedor_id = ")
                .push_bind(cliente_fornecedor_id);
        }
        if let Some(recorrencia) = filter.recorrencia {
            query.push(" AND recorrencia = ").push_bind(recorrencia);
        }
        if let Some(termo) = filter.search_term() {
            query
                .push(" AND descricao ILIKE ")
                .push_bind(contains_pattern(termo))
                .push(r" ESCAPE '\'");
        }

        query.push(" ORDER BY data_vencimento DESC, created_at DESC");

        let accounts = query
            .build_query_as::<Account>()
            .fetch_all(&self.pool)
            .await?;

        Ok(accounts)
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT * FROM contas_pagar_receber WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn insert(&self, account: &Account) -> Result<Account, AppError> {
        let created = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO contas_pagar_receber (
                id, user_id, tipo, descricao,
                valor, valor_pago, status,
                data_vencimento, data_pagamento,
                recorrencia, data_proxima_recorrencia, conta_origem_id,
                category_id, cliente_fornecedor_id,
                numero_documento, observacoes,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING *
            "#,
        )
        .bind(account.id)
        .bind(account.user_id)
        .bind(account.tipo)
        .bind(&account.descricao)
        .bind(account.valor)
        .bind(account.valor_pago)
        .bind(account.status)
        .bind(account.data_vencimento)
        .bind(account.data_pagamento)
        .bind(account.recorrencia)
        .bind(account.data_proxima_recorrencia)
        .bind(account.conta_origem_id)
        .bind(account.category_id)
        .bind(account.cliente_fornecedor_id)
        .bind(&account.numero_documento)
        .bind(&account.observacoes)
        .bind(account.created_at)
        .bind(account.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn save(&self, account: &Account) -> Result<Option<Account>, AppError> {
        let updated = sqlx::query_as::<_, Account>(
            r#"
            UPDATE contas_pagar_receber SET
                descricao = $3,
                valor = $4,
                status = $5,
                data_vencimento = $6,
                recorrencia = $7,
                data_proxima_recorrencia = $8,
                category_id = $9,
                cliente_fornecedor_id = $10,
                numero_documento = $11,
                observacoes = $12,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND valor_pago = $13
            RETURNING *
            "#,
        )
        .bind(account.id)
        .bind(account.user_id)
        .bind(&account.descricao)
        .bind(account.valor)
        .bind(account.status)
        .bind(account.data_vencimento)
        .bind(account.recorrencia)
        .bind(account.data_proxima_recorrencia)
        .bind(account.category_id)
        .bind(account.cliente_fornecedor_id)
        .bind(&account.numero_documento)
        .bind(&account.observacoes)
        .bind(account.valor_pago)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn record_payment(
        &self,
        user_id: Uuid,
        id: Uuid,
        record: PaymentRecord,
    ) -> Result<Option<Account>, AppError> {
        // Update condicional: se outra sessão pagou antes, nenhuma linha casa
        let updated = sqlx::query_as::<_, Account>(
            r#"
            UPDATE contas_pagar_receber SET
                valor_pago = $3,
                status = $4,
                data_pagamento = $5,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND valor_pago = $6
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(record.valor_pago)
        .bind(record.status)
        .bind(record.data_pagamento)
        .bind(record.expected_paid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM contas_pagar_receber WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
