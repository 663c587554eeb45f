// src/services/ledger_service.rs

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{AppError, Resource},
    db::{CategoryStore, LedgerStore},
    models::ledger::{LedgerFilter, LedgerTransaction, NewLedgerTransaction},
};

/// Lançamentos manuais do livro caixa. Os espelhados vêm do
/// `TransactionMirror`.
#[derive(Clone)]
pub struct LedgerService {
    ledger: Arc<dyn LedgerStore>,
    categories: Arc<dyn CategoryStore>,
}

impl LedgerService {
    pub fn new(ledger: Arc<dyn LedgerStore>, categories: Arc<dyn CategoryStore>) -> Self {
        Self { ledger, categories }
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        filter: &LedgerFilter,
    ) -> Result<Vec<LedgerTransaction>, AppError> {
        self.ledger.list(user_id, filter).await
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        payload: NewLedgerTransaction,
    ) -> Result<LedgerTransaction, AppError> {
        payload.validate()?;
        if payload.estabelecimento.trim().is_empty() {
            return Err(AppError::invalid_field(
                "estabelecimento",
                "required",
                "O estabelecimento é obrigatório.",
            ));
        }
        if payload.valor <= Decimal::ZERO {
            return Err(AppError::invalid_field(
                "valor",
                "positive",
                "O valor deve ser maior que zero.",
            ));
        }
        if let Some(category_id) = payload.category_id {
            self.categories
                .find(user_id, category_id)
                .await?
                .ok_or(AppError::NotFound(Resource::Categoria))?;
        }

        let transacao = LedgerTransaction {
            id: Uuid::new_v4(),
            user_id,
            category_id: payload.category_id,
            estabelecimento: payload.estabelecimento.trim().to_string(),
            valor: payload.valor,
            detalhes: payload.detalhes,
            tipo: payload.tipo,
            quando: payload.quando,
            created_at: Utc::now(),
        };

        self.ledger.insert(&transacao).await
    }
}
