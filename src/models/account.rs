// src/models/account.rs

use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::ledger::LedgerKind;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "conta_tipo", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Pagar,   // Fornecedor -> Despesa
    Receber, // Cliente -> Receita
}

impl AccountKind {
    /// Tipo do lançamento no livro caixa quando um pagamento é espelhado.
    pub fn ledger_kind(self) -> LedgerKind {
        match self {
            AccountKind::Pagar => LedgerKind::Despesa,
            AccountKind::Receber => LedgerKind::Receita,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "conta_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Pendente,
    ParcialmentePago,
    Pago,
    Vencido, // Apenas projeção de leitura, nunca gravado pelo serviço
    Cancelado,
}

impl AccountStatus {
    /// Status derivado dos valores. `pago` se e somente se `valor_pago >= valor`.
    pub fn from_amounts(valor_pago: Decimal, valor: Decimal) -> Self {
        if valor_pago >= valor {
            AccountStatus::Pago
        } else if valor_pago > Decimal::ZERO {
            AccountStatus::ParcialmentePago
        } else {
            AccountStatus::Pendente
        }
    }

    pub fn is_open(self) -> bool {
        !matches!(self, AccountStatus::Pago | AccountStatus::Cancelado)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "conta_recorrencia", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    #[default]
    Unica,
    Mensal,
    Trimestral,
    Semestral,
    Anual,
}

impl Recurrence {
    fn months(self) -> Option<u32> {
        match self {
            Recurrence::Unica => None,
            Recurrence::Mensal => Some(1),
            Recurrence::Trimestral => Some(3),
            Recurrence::Semestral => Some(6),
            Recurrence::Anual => Some(12),
        }
    }

    /// Próximo vencimento a partir de `from`. `None` para `unica`.
    ///
    /// Fim de mês segue o `checked_add_months` do chrono: o dia é limitado ao
    /// último dia válido do mês de destino (31/01 + 1 mês = 29/02 em 2024).
    pub fn next_due_date(self, from: NaiveDate) -> Option<NaiveDate> {
        self.months()
            .and_then(|months| from.checked_add_months(Months::new(months)))
    }

    pub fn is_recurring(self) -> bool {
        self != Recurrence::Unica
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(ignore)]
    pub user_id: Uuid,

    pub tipo: AccountKind,

    #[schema(example = "Aluguel do escritório")]
    pub descricao: String,

    // Valores
    #[schema(example = "300.00")]
    pub valor: Decimal,
    #[schema(example = "100.00")]
    pub valor_pago: Decimal,

    pub status: AccountStatus,

    // Datas
    #[schema(value_type = String, format = Date, example = "2024-01-10")]
    pub data_vencimento: NaiveDate,
    #[schema(value_type = Option<String>, format = Date, example = "2024-01-10")]
    pub data_pagamento: Option<NaiveDate>,

    pub recorrencia: Recurrence,
    #[schema(value_type = Option<String>, format = Date, example = "2024-02-10")]
    pub data_proxima_recorrencia: Option<NaiveDate>,

    // Vínculos
    pub conta_origem_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub cliente_fornecedor_id: Option<Uuid>,

    pub numero_documento: Option<String>,
    pub observacoes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Status como a interface deve exibir: contas em aberto com vencimento
    /// anterior a `today` aparecem como `vencido`.
    pub fn display_status(&self, today: NaiveDate) -> AccountStatus {
        if self.status.is_open() && self.data_vencimento < today {
            AccountStatus::Vencido
        } else {
            self.status
        }
    }

    pub fn with_display_status(mut self, today: NaiveDate) -> Self {
        self.status = self.display_status(today);
        self
    }
}

// --- Payloads ---

/// Rascunho de conta vindo da interface. Os campos obrigatórios são `Option`
/// para que a ausência vire erro de validação e não erro de desserialização.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[validate(required(message = "O tipo é obrigatório."))]
    pub tipo: Option<AccountKind>,

    #[validate(required(message = "A descrição é obrigatória."))]
    #[schema(example = "Aluguel do escritório")]
    pub descricao: Option<String>,

    #[validate(required(message = "O valor é obrigatório."))]
    #[schema(example = "300.00")]
    pub valor: Option<Decimal>,

    #[validate(required(message = "A data de vencimento é obrigatória."))]
    #[schema(value_type = Option<String>, format = Date, example = "2024-01-10")]
    pub data_vencimento: Option<NaiveDate>,

    #[serde(default)]
    pub recorrencia: Recurrence,

    pub category_id: Option<Uuid>,
    pub cliente_fornecedor_id: Option<Uuid>,
    pub numero_documento: Option<String>,
    pub observacoes: Option<String>,
}

/// Atualização parcial. `valor_pago` e `status` ficam de fora de propósito:
/// só o serviço de pagamento mexe neles.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountPatch {
    pub descricao: Option<String>,
    pub valor: Option<Decimal>,
    #[schema(value_type = Option<String>, format = Date)]
    pub data_vencimento: Option<NaiveDate>,
    pub recorrencia: Option<Recurrence>,

    // `null` explícito limpa o vínculo; campo ausente mantém
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>)]
    pub category_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>)]
    pub cliente_fornecedor_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub numero_documento: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub observacoes: Option<Option<String>>,
}

pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Filtros da listagem. O filtro de status compara com o status exibido,
/// então `vencido` funciona mesmo sem nunca ser gravado.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AccountFilter {
    pub tipo: Option<AccountKind>,
    pub status: Option<AccountStatus>,
    #[param(value_type = Option<String>, format = Date)]
    pub de: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub ate: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
    pub cliente_fornecedor_id: Option<Uuid>,
    pub recorrencia: Option<Recurrence>,
    pub busca: Option<String>,
}

impl AccountFilter {
    pub fn matches(&self, account: &Account, today: NaiveDate) -> bool {
        self.tipo.is_none_or(|t| account.tipo == t)
            && self.status.is_none_or(|s| account.display_status(today) == s)
            && self.de.is_none_or(|de| account.data_vencimento >= de)
            && self.ate.is_none_or(|ate| account.data_vencimento <= ate)
            && self.category_id.is_none_or(|c| account.category_id == Some(c))
            && self
                .cliente_fornecedor_id
                .is_none_or(|c| account.cliente_fornecedor_id == Some(c))
            && self.recorrencia.is_none_or(|r| account.recorrencia == r)
            && self.search_term().is_none_or(|termo| {
                account.descricao.to_lowercase().contains(&termo.to_lowercase())
            })
    }

    pub fn search_term(&self) -> Option<&str> {
        self.busca.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}
