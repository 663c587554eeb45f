// src/models/category.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::ledger::LedgerKind;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,

    #[schema(ignore)]
    pub user_id: Uuid,

    #[schema(example = "Moradia")]
    pub nome: String,

    pub tipo: LedgerKind,

    #[schema(example = "#3b82f6")]
    pub cor: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    pub tipo: LedgerKind,
    pub cor: Option<String>,
}
