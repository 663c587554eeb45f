// src/services/account_service.rs

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    common::error::{field_error, AppError, Resource},
    db::{AccountStore, CategoryStore, CounterpartyStore},
    models::account::{Account, AccountFilter, AccountPatch, AccountStatus, NewAccount},
};

/// CRUD das contas a pagar/receber, sempre escopado pelo dono.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    categories: Arc<dyn CategoryStore>,
    counterparties: Arc<dyn CounterpartyStore>,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        categories: Arc<dyn CategoryStore>,
        counterparties: Arc<dyn CounterpartyStore>,
    ) -> Self {
        Self {
            accounts,
            categories,
            counterparties,
        }
    }

    /// Lista ordenada por vencimento (mais recente primeiro), já com a
    /// projeção de `vencido` aplicada.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: &AccountFilter,
        today: NaiveDate,
    ) -> Result<Vec<Account>, AppError> {
        let accounts = self.accounts.list(user_id, filter, today).await?;
        Ok(accounts
            .into_iter()
            .map(|a| a.with_display_status(today))
            .collect())
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid, today: NaiveDate) -> Result<Account, AppError> {
        Ok(self.find_owned(user_id, id).await?.with_display_status(today))
    }

    pub async fn create(&self, user_id: Uuid, draft: NewAccount) -> Result<Account, AppError> {
        let mut errors = draft.validate().err().unwrap_or_else(ValidationErrors::new);

        if draft.descricao.as_deref().is_some_and(|d| d.trim().is_empty()) {
            errors.add("descricao", field_error("required", "A descrição é obrigatória."));
        }
        if draft.valor.is_some_and(|v| v <= Decimal::ZERO) {
            errors.add("valor", field_error("positive", "O valor deve ser maior que zero."));
        }

        let (tipo, descricao, valor, data_vencimento) =
            match (draft.tipo, draft.descricao, draft.valor, draft.data_vencimento) {
                (Some(tipo), Some(descricao), Some(valor), Some(data_vencimento))
                    if errors.is_empty() =>
                {
                    (tipo, descricao, valor, data_vencimento)
                }
                _ => return Err(AppError::ValidationError(errors)),
            };

        self.check_links(user_id, draft.category_id, draft.cliente_fornecedor_id)
            .await?;

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            user_id,
            tipo,
            descricao: descricao.trim().to_string(),
            valor,
            valor_pago: Decimal::ZERO,
            status: AccountStatus::Pendente,
            data_vencimento,
            data_pagamento: None,
            recorrencia: draft.recorrencia,
            data_proxima_recorrencia: draft.recorrencia.next_due_date(data_vencimento),
            conta_origem_id: None,
            category_id: draft.category_id,
            cliente_fornecedor_id: draft.cliente_fornecedor_id,
            numero_documento: draft.numero_documento,
            observacoes: draft.observacoes,
            created_at: now,
            updated_at: now,
        };

        let created = self.accounts.insert(&account).await?;
        tracing::info!(conta_id = %created.id, tipo = ?created.tipo, "Conta criada");
        Ok(created)
    }

    /// Atualiza só os campos enviados. Campos derivados (status, próxima
    /// recorrência) são recalculados quando suas fontes mudam.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: AccountPatch,
    ) -> Result<Account, AppError> {
        let mut account = self.find_owned(user_id, id).await?;

        if let Some(descricao) = patch.descricao {
            if descricao.trim().is_empty() {
                return Err(AppError::invalid_field(
                    "descricao",
                    "required",
                    "A descrição é obrigatória.",
                ));
            }
            account.descricao = descricao.trim().to_string();
        }

        if let Some(valor) = patch.valor {
            if valor <= Decimal::ZERO {
                return Err(AppError::invalid_field(
                    "valor",
                    "positive",
                    "O valor deve ser maior que zero.",
                ));
            }
            // Conta quitada já gerou sua sucessora, não pode voltar a ficar em aberto
            if account.status == AccountStatus::Pago && valor != account.valor {
                return Err(AppError::invalid_field(
                    "valor",
                    "already_paid",
                    "O valor de uma conta paga não pode ser alterado.",
                ));
            }
            account.valor = valor;
            if account.status != AccountStatus::Cancelado {
                account.status = AccountStatus::from_amounts(account.valor_pago, valor);
            }
        }

        let schedule_changed = patch.data_vencimento.is_some() || patch.recorrencia.is_some();
        if let Some(data_vencimento) = patch.data_vencimento {
            account.data_vencimento = data_vencimento;
        }
        if let Some(recorrencia) = patch.recorrencia {
            account.recorrencia = recorrencia;
        }
        if schedule_changed {
            account.data_proxima_recorrencia =
                account.recorrencia.next_due_date(account.data_vencimento);
        }

        self.check_links(
            user_id,
            patch.category_id.flatten(),
            patch.cliente_fornecedor_id.flatten(),
        )
        .await?;
        if let Some(category_id) = patch.category_id {
            account.category_id = category_id;
        }
        if let Some(cliente_fornecedor_id) = patch.cliente_fornecedor_id {
            account.cliente_fornecedor_id = cliente_fornecedor_id;
        }
        if let Some(numero_documento) = patch.numero_documento {
            account.numero_documento = numero_documento;
        }
        if let Some(observacoes) = patch.observacoes {
            account.observacoes = observacoes;
        }

        self.accounts.save_checked(&account).await
    }

    /// Exclusão física, sem cascata para as sucessoras já geradas.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.accounts.delete(user_id, id).await? {
            return Err(AppError::NotFound(Resource::Conta));
        }
        tracing::info!(conta_id = %id, "Conta excluída");
        Ok(())
    }

    pub async fn cancel(&self, user_id: Uuid, id: Uuid) -> Result<Account, AppError> {
        let mut account = self.find_owned(user_id, id).await?;

        match account.status {
            AccountStatus::Cancelado => return Ok(account),
            AccountStatus::Pago => {
                return Err(AppError::invalid_field(
                    "status",
                    "already_paid",
                    "Uma conta paga não pode ser cancelada.",
                ));
            }
            _ => account.status = AccountStatus::Cancelado,
        }

        let cancelled = self.accounts.save_checked(&account).await?;
        tracing::info!(conta_id = %id, "Conta cancelada");
        Ok(cancelled)
    }

    async fn find_owned(&self, user_id: Uuid, id: Uuid) -> Result<Account, AppError> {
        self.accounts
            .find(user_id, id)
            .await?
            .ok_or(AppError::NotFound(Resource::Conta))
    }

    // Vínculos precisam pertencer ao mesmo usuário
    async fn check_links(
        &self,
        user_id: Uuid,
        category_id: Option<Uuid>,
        cliente_fornecedor_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        if let Some(category_id) = category_id {
            self.categories
                .find(user_id, category_id)
                .await?
                .ok_or(AppError::NotFound(Resource::Categoria))?;
        }
        if let Some(cliente_fornecedor_id) = cliente_fornecedor_id {
            self.counterparties
                .find(user_id, cliente_fornecedor_id)
                .await?
                .ok_or(AppError::NotFound(Resource::Contraparte))?;
        }
        Ok(())
    }
}
