// src/services/mirror_service.rs

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CounterpartyStore, LedgerStore},
    models::{
        account::{Account, AccountKind},
        ledger::LedgerTransaction,
    },
};

/// Espelha pagamentos de contas no livro caixa, para o fluxo de caixa
/// refletir o que foi pago ou recebido.
#[derive(Clone)]
pub struct TransactionMirror {
    ledger: Arc<dyn LedgerStore>,
    counterparties: Arc<dyn CounterpartyStore>,
}

impl TransactionMirror {
    pub fn new(ledger: Arc<dyn LedgerStore>, counterparties: Arc<dyn CounterpartyStore>) -> Self {
        Self {
            ledger,
            counterparties,
        }
    }

    /// Cria um lançamento com o valor deste pagamento (não o total da conta).
    pub async fn mirror_payment(
        &self,
        account: &Account,
        amount_paid: Decimal,
        payment_date: NaiveDate,
    ) -> Result<LedgerTransaction, AppError> {
        let estabelecimento = match self.counterparty_name(account).await {
            Some(nome) => nome,
            None => fallback_label(account.tipo).to_string(),
        };

        let transacao = LedgerTransaction {
            id: Uuid::new_v4(),
            user_id: account.user_id,
            category_id: account.category_id,
            estabelecimento,
            valor: amount_paid,
            detalhes: Some(details(account)),
            tipo: account.tipo.ledger_kind(),
            quando: payment_date,
            created_at: Utc::now(),
        };

        let created = self.ledger.insert(&transacao).await?;
        tracing::info!(
            conta_id = %account.id,
            transacao_id = %created.id,
            valor = %amount_paid,
            "Pagamento espelhado no livro caixa"
        );
        Ok(created)
    }

    // Falha ao buscar o nome não impede o lançamento: cai no rótulo genérico
    async fn counterparty_name(&self, account: &Account) -> Option<String> {
        let id = account.cliente_fornecedor_id?;
        match self.counterparties.find(account.user_id, id).await {
            Ok(found) => found.map(|c| c.nome),
            Err(e) => {
                tracing::warn!(conta_id = %account.id, "Falha ao buscar cliente/fornecedor: {}", e);
                None
            }
        }
    }
}

fn fallback_label(tipo: AccountKind) -> &'static str {
    match tipo {
        AccountKind::Pagar => "Pagamento de conta",
        AccountKind::Receber => "Recebimento de conta",
    }
}

fn details(account: &Account) -> String {
    let prefixo = match account.tipo {
        AccountKind::Pagar => "Pagamento da conta",
        AccountKind::Receber => "Recebimento da conta",
    };
    match account.numero_documento.as_deref() {
        Some(doc) => format!("{}: {} (doc. {})", prefixo, account.descricao, doc),
        None => format!("{}: {}", prefixo, account.descricao),
    }
}
