// src/models/payment.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{account::Account, ledger::LedgerTransaction};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    #[schema(example = "100.00")]
    pub valor: Decimal,

    /// Quando ausente, usa a data de hoje
    #[schema(value_type = Option<String>, format = Date, example = "2024-01-10")]
    pub data_pagamento: Option<NaiveDate>,
}

/// Efeitos colaterais que falharam ou foram pulados. Nenhum deles desfaz o
/// pagamento já gravado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentWarning {
    /// A transação no livro caixa não pôde ser criada
    MirrorFailed,
    /// Conta recorrente sem próxima data calculada
    RecurrenceSkipped,
    /// A conta sucessora não pôde ser criada
    RecurrenceFailed,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub conta: Account,
    pub transacao: Option<LedgerTransaction>,
    pub conta_gerada: Option<Account>,
    pub avisos: Vec<PaymentWarning>,
}

impl PaymentOutcome {
    /// Chave da mensagem exibida ao usuário. Falha no espelhamento tem
    /// prioridade: é o caso que o usuário precisa corrigir à mão.
    pub fn message_key(&self) -> &'static str {
        if self.avisos.contains(&PaymentWarning::MirrorFailed) {
            "payment.mirror_failed"
        } else if self.avisos.contains(&PaymentWarning::RecurrenceFailed) {
            "payment.recurrence_failed"
        } else if self.avisos.contains(&PaymentWarning::RecurrenceSkipped) {
            "payment.recurrence_skipped"
        } else if self.conta_gerada.is_some() {
            "payment.recorded_with_successor"
        } else {
            "payment.recorded"
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    #[serde(flatten)]
    pub outcome: PaymentOutcome,
    /// Mensagem pronta para exibir ao usuário, no idioma da requisição
    pub mensagem: String,
}
