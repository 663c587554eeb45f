// src/models/ledger.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transacao_tipo", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    Receita, // Entrada
    Despesa, // Saída
}

/// Lançamento do livro caixa (tabela `transacoes`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTransaction {
    pub id: Uuid,

    // A coluna é camelCase no banco, herança do esquema original
    #[sqlx(rename = "userId")]
    #[schema(ignore)]
    pub user_id: Uuid,

    pub category_id: Option<Uuid>,

    #[schema(example = "Imobiliária Central")]
    pub estabelecimento: String,

    #[schema(example = "300.00")]
    pub valor: Decimal,

    #[schema(example = "Pagamento da conta: Aluguel do escritório")]
    pub detalhes: Option<String>,

    pub tipo: LedgerKind,

    #[schema(value_type = String, format = Date, example = "2024-01-10")]
    pub quando: NaiveDate,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewLedgerTransaction {
    #[validate(length(min = 1, message = "O estabelecimento é obrigatório."))]
    pub estabelecimento: String,
    #[schema(example = "59.90")]
    pub valor: Decimal,
    pub tipo: LedgerKind,
    #[schema(value_type = String, format = Date, example = "2024-01-10")]
    pub quando: NaiveDate,
    pub category_id: Option<Uuid>,
    pub detalhes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LedgerFilter {
    pub tipo: Option<LedgerKind>,
    #[param(value_type = Option<String>, format = Date)]
    pub de: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub ate: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
}

impl LedgerFilter {
    pub fn matches(&self, transacao: &LedgerTransaction) -> bool {
        self.tipo.is_none_or(|t| transacao.tipo == t)
            && self.de.is_none_or(|de| transacao.quando >= de)
            && self.ate.is_none_or(|ate| transacao.quando <= ate)
            && self.category_id.is_none_or(|c| transacao.category_id == Some(c))
    }
}
