// src/services/recurrence_service.rs

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::{AppError, Resource},
    db::AccountStore,
    models::account::{Account, AccountStatus, Recurrence},
};

/// Próximo vencimento de uma conta recorrente. `None` para `unica`.
pub fn compute_next_due_date(current_due_date: NaiveDate, kind: Recurrence) -> Option<NaiveDate> {
    kind.next_due_date(current_due_date)
}

#[derive(Clone)]
pub struct RecurrenceService {
    accounts: Arc<dyn AccountStore>,
}

impl RecurrenceService {
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Transforma a conta em `unica`. Sucessoras já geradas não são tocadas.
    pub async fn stop_recurrence(&self, user_id: Uuid, account_id: Uuid) -> Result<Account, AppError> {
        let mut account = self
            .accounts
            .find(user_id, account_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Conta))?;

        account.recorrencia = Recurrence::Unica;
        account.data_proxima_recorrencia = None;

        let updated = self.accounts.save_checked(&account).await?;

        tracing::info!(conta_id = %account_id, "Recorrência interrompida");
        Ok(updated)
    }

    /// Cria a próxima ocorrência de uma conta quitada.
    ///
    /// Sem recorrência ou sem `data_proxima_recorrencia` não há o que gerar:
    /// devolve `Ok(None)` sem erro.
    pub async fn generate_next_occurrence(
        &self,
        settled: &Account,
    ) -> Result<Option<Account>, AppError> {
        let Some(next_due) = settled
            .data_proxima_recorrencia
            .filter(|_| settled.recorrencia.is_recurring())
        else {
            tracing::debug!(conta_id = %settled.id, "Conta sem recorrência, nada a gerar");
            return Ok(None);
        };

        let now = Utc::now();
        let successor = Account {
            id: Uuid::new_v4(),
            valor_pago: Decimal::ZERO,
            status: AccountStatus::Pendente,
            data_vencimento: next_due,
            data_pagamento: None,
            data_proxima_recorrencia: compute_next_due_date(next_due, settled.recorrencia),
            conta_origem_id: Some(settled.id),
            created_at: now,
            updated_at: now,
            ..settled.clone()
        };

        let created = self.accounts.insert(&successor).await?;
        tracing::info!(
            conta_id = %settled.id,
            sucessora_id = %created.id,
            vencimento = %created.data_vencimento,
            "Próxima ocorrência gerada"
        );
        Ok(Some(created))
    }
}
