// src/models/counterparty.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::account::{nullable, AccountKind};

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "contraparte_tipo", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CounterpartyKind {
    Cliente,
    Fornecedor,
    Ambos,
}

impl CounterpartyKind {
    /// Contas a pagar vão para fornecedores, a receber para clientes.
    /// A regra vale só para filtrar listas; o banco não a impõe.
    pub fn compatible_with(self, tipo: AccountKind) -> bool {
        match (self, tipo) {
            (CounterpartyKind::Ambos, _) => true,
            (CounterpartyKind::Fornecedor, AccountKind::Pagar) => true,
            (CounterpartyKind::Cliente, AccountKind::Receber) => true,
            _ => false,
        }
    }

    /// Os dois tipos aceitos para um tipo de conta, na forma usada pelo SQL.
    pub fn compatible_kinds(tipo: AccountKind) -> [Self; 2] {
        match tipo {
            AccountKind::Pagar => [CounterpartyKind::Fornecedor, CounterpartyKind::Ambos],
            AccountKind::Receber => [CounterpartyKind::Cliente, CounterpartyKind::Ambos],
        }
    }
}

// --- CLIENTE / FORNECEDOR ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Counterparty {
    pub id: Uuid,

    #[schema(ignore)]
    pub user_id: Uuid,

    #[schema(example = "Imobiliária Central")]
    pub nome: String,
    pub tipo: CounterpartyKind,

    pub documento: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub observacoes: Option<String>,

    // Soft delete
    pub ativo: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCounterparty {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    pub tipo: CounterpartyKind,
    pub documento: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CounterpartyPatch {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: Option<String>,
    pub tipo: Option<CounterpartyKind>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub documento: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub telefone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub endereco: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub observacoes: Option<Option<String>>,
    pub ativo: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CounterpartyFilter {
    pub tipo: Option<CounterpartyKind>,
    /// Restringe aos compatíveis com o tipo de conta (formulário de contas)
    pub para_conta: Option<AccountKind>,
    pub ativo: Option<bool>,
    pub busca: Option<String>,
}

impl CounterpartyFilter {
    pub fn matches(&self, contraparte: &Counterparty) -> bool {
        self.tipo.is_none_or(|t| contraparte.tipo == t)
            && self.para_conta.is_none_or(|k| contraparte.tipo.compatible_with(k))
            && self.ativo.is_none_or(|a| contraparte.ativo == a)
            && self
                .busca
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .is_none_or(|termo| contraparte.nome.to_lowercase().contains(&termo.to_lowercase()))
    }
}
