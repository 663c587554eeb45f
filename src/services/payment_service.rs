// src/services/payment_service.rs

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::{AppError, Resource},
    db::{AccountStore, PaymentRecord},
    models::{
        account::{Account, AccountStatus},
        payment::{PaymentOutcome, PaymentWarning},
    },
    services::{mirror_service::TransactionMirror, recurrence_service::RecurrenceService},
};

/// Aplica pagamentos em contas: grava o pagamento, espelha no livro caixa e
/// gera a próxima ocorrência quando a conta recorrente é quitada.
///
/// Só a gravação do pagamento é obrigatória. Espelhamento e recorrência são
/// efeitos colaterais: se falharem, o pagamento continua valendo e a falha
/// volta como aviso em `PaymentOutcome`.
#[derive(Clone)]
pub struct PaymentService {
    accounts: Arc<dyn AccountStore>,
    mirror: TransactionMirror,
    recurrence: RecurrenceService,
}

impl PaymentService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        mirror: TransactionMirror,
        recurrence: RecurrenceService,
    ) -> Self {
        Self {
            accounts,
            mirror,
            recurrence,
        }
    }

    pub async fn apply_payment(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        amount: Decimal,
        payment_date: NaiveDate,
    ) -> Result<PaymentOutcome, AppError> {
        if amount <= Decimal::ZERO {
            return Err(AppError::invalid_field(
                "valor",
                "positive",
                "O valor do pagamento deve ser maior que zero.",
            ));
        }

        let account = self
            .accounts
            .find(user_id, account_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Conta))?;

        if account.status == AccountStatus::Cancelado {
            return Err(AppError::invalid_field(
                "status",
                "cancelled",
                "Não é possível pagar uma conta cancelada.",
            ));
        }

        // 1. Grava o pagamento. Qualquer falha aqui aborta tudo.
        let valor_pago = account.valor_pago + amount;
        let record = PaymentRecord {
            expected_paid: account.valor_pago,
            valor_pago,
            status: AccountStatus::from_amounts(valor_pago, account.valor),
            data_pagamento: payment_date,
        };
        let updated = self.record(user_id, &account, record).await?;

        tracing::info!(
            conta_id = %updated.id,
            valor = %amount,
            valor_pago = %updated.valor_pago,
            status = ?updated.status,
            "Pagamento registrado"
        );

        let mut avisos = Vec::new();

        // 2. Espelha no livro caixa (best-effort)
        let transacao = match self.mirror.mirror_payment(&updated, amount, payment_date).await {
            Ok(transacao) => Some(transacao),
            Err(e) => {
                tracing::warn!(conta_id = %updated.id, "Falha ao espelhar pagamento: {}", e);
                avisos.push(PaymentWarning::MirrorFailed);
                None
            }
        };

        // 3. Recorrência, apenas na transição para "pago"
        let conta_gerada = if settles(&account, &updated) {
            self.spawn_successor(&updated, &mut avisos).await
        } else {
            None
        };

        Ok(PaymentOutcome {
            conta: updated,
            transacao,
            conta_gerada,
            avisos,
        })
    }

    async fn record(
        &self,
        user_id: Uuid,
        account: &Account,
        record: PaymentRecord,
    ) -> Result<Account, AppError> {
        if let Some(updated) = self
            .accounts
            .record_payment(user_id, account.id, record)
            .await?
        {
            return Ok(updated);
        }

        // Nada foi gravado: ou a conta sumiu, ou outro pagamento chegou antes
        match self.accounts.find(user_id, account.id).await? {
            Some(_) => {
                tracing::warn!(conta_id = %account.id, "Pagamento concorrente detectado");
                Err(AppError::Conflict)
            }
            None => Err(AppError::NotFound(Resource::Conta)),
        }
    }

    async fn spawn_successor(
        &self,
        settled: &Account,
        avisos: &mut Vec<PaymentWarning>,
    ) -> Option<Account> {
        // Só `unica` sai sem aviso; recorrente sem próxima data vira RecurrenceSkipped
        if !settled.recorrencia.is_recurring() {
            return None;
        }
        match self.recurrence.generate_next_occurrence(settled).await {
            Ok(Some(sucessora)) => Some(sucessora),
            Ok(None) => {
                tracing::warn!(conta_id = %settled.id, "Conta recorrente sem próxima data");
                avisos.push(PaymentWarning::RecurrenceSkipped);
                None
            }
            Err(e) => {
                tracing::warn!(conta_id = %settled.id, "Falha ao gerar próxima ocorrência: {}", e);
                avisos.push(PaymentWarning::RecurrenceFailed);
                None
            }
        }
    }
}

fn settles(before: &Account, after: &Account) -> bool {
    before.status != AccountStatus::Pago && after.status == AccountStatus::Pago
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        account::{AccountKind, AccountPatch, Recurrence},
        ledger::LedgerKind,
    };
    use crate::test_utils::{date, StaleReads, TestContext};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn full_payment_settles_mirrors_and_spawns_successor() {
        let ctx = TestContext::new();
        let conta = ctx.create_account(dec!(300), Recurrence::Mensal).await;

        let outcome = ctx
            .state
            .payment_service
            .apply_payment(ctx.user_id, conta.id, dec!(300), date(2024, 1, 10))
            .await
            .unwrap();

        assert_eq!(outcome.conta.status, AccountStatus::Pago);
        assert_eq!(outcome.conta.valor_pago, dec!(300));
        assert_eq!(outcome.conta.data_pagamento, Some(date(2024, 1, 10)));
        assert!(outcome.avisos.is_empty());

        let ledger = ctx.store.all_ledger();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].tipo, LedgerKind::Despesa);
        assert_eq!(ledger[0].valor, dec!(300));

        assert_eq!(outcome.message_key(), "payment.recorded_with_successor");
        let sucessora = outcome.conta_gerada.unwrap();
        assert_eq!(sucessora.tipo, AccountKind::Pagar);
        assert_eq!(sucessora.data_vencimento, date(2024, 2, 10));
        assert_eq!(sucessora.status, AccountStatus::Pendente);
        assert_eq!(sucessora.valor_pago, Decimal::ZERO);
        assert_eq!(sucessora.conta_origem_id, Some(conta.id));
        assert_eq!(ctx.store.all_accounts().len(), 2);
    }

    #[tokio::test]
    async fn partial_payments_defer_successor_until_settled() {
        let ctx = TestContext::new();
        let conta = ctx.create_account(dec!(300), Recurrence::Mensal).await;
        let service = &ctx.state.payment_service;

        let primeiro = service
            .apply_payment(ctx.user_id, conta.id, dec!(100), date(2024, 1, 5))
            .await
            .unwrap();
        assert_eq!(primeiro.conta.status, AccountStatus::ParcialmentePago);
        assert_eq!(primeiro.conta.valor_pago, dec!(100));
        assert!(primeiro.conta_gerada.is_none());
        assert_eq!(ctx.store.all_accounts().len(), 1);

        let segundo = service
            .apply_payment(ctx.user_id, conta.id, dec!(200), date(2024, 1, 10))
            .await
            .unwrap();
        assert_eq!(segundo.conta.status, AccountStatus::Pago);
        assert_eq!(segundo.conta.valor_pago, dec!(300));
        assert!(segundo.conta_gerada.is_some());

        // Um lançamento por pagamento, com o valor de cada pagamento
        let mut valores: Vec<Decimal> = ctx.store.all_ledger().iter().map(|t| t.valor).collect();
        valores.sort();
        assert_eq!(valores, vec![dec!(100), dec!(200)]);
    }

    #[tokio::test]
    async fn overpayment_clamps_to_paid() {
        let ctx = TestContext::new();
        let conta = ctx.create_account(dec!(300), Recurrence::Unica).await;

        let outcome = ctx
            .state
            .payment_service
            .apply_payment(ctx.user_id, conta.id, dec!(450), date(2024, 1, 10))
            .await
            .unwrap();

        assert_eq!(outcome.conta.status, AccountStatus::Pago);
        assert_eq!(outcome.conta.valor_pago, dec!(450));
        assert!(outcome.conta_gerada.is_none());
        assert_eq!(outcome.message_key(), "payment.recorded");
    }

    #[tokio::test]
    async fn extra_payment_on_paid_account_spawns_no_second_successor() {
        let ctx = TestContext::new();
        let conta = ctx.create_account(dec!(300), Recurrence::Mensal).await;
        let service = &ctx.state.payment_service;

        service
            .apply_payment(ctx.user_id, conta.id, dec!(300), date(2024, 1, 10))
            .await
            .unwrap();
        let extra = service
            .apply_payment(ctx.user_id, conta.id, dec!(10), date(2024, 1, 11))
            .await
            .unwrap();

        assert!(extra.conta_gerada.is_none());
        assert_eq!(extra.conta.status, AccountStatus::Pago);
        assert_eq!(ctx.store.all_accounts().len(), 2);
        assert_eq!(ctx.store.all_ledger().len(), 2);
    }

    #[tokio::test]
    async fn recurring_account_without_next_date_warns() {
        let ctx = TestContext::new();
        let conta = ctx.create_account(dec!(300), Recurrence::Mensal).await;
        let sem_data = Account {
            data_proxima_recorrencia: None,
            ..conta.clone()
        };
        AccountStore::save(ctx.store.as_ref(), &sem_data).await.unwrap();

        let outcome = ctx
            .state
            .payment_service
            .apply_payment(ctx.user_id, conta.id, dec!(300), date(2024, 1, 10))
            .await
            .unwrap();

        assert_eq!(outcome.conta.status, AccountStatus::Pago);
        assert!(outcome.transacao.is_some());
        assert!(outcome.conta_gerada.is_none());
        assert_eq!(outcome.avisos, vec![PaymentWarning::RecurrenceSkipped]);
        assert_eq!(outcome.message_key(), "payment.recurrence_skipped");
        assert_eq!(ctx.store.all_accounts().len(), 1);
    }

    #[tokio::test]
    async fn paid_account_cannot_be_reopened_for_a_second_successor() {
        let ctx = TestContext::new();
        let conta = ctx.create_account(dec!(300), Recurrence::Mensal).await;
        ctx.state
            .payment_service
            .apply_payment(ctx.user_id, conta.id, dec!(300), date(2024, 1, 10))
            .await
            .unwrap();

        let patch = AccountPatch { valor: Some(dec!(400)), ..Default::default() };
        let err = ctx
            .state
            .account_service
            .update(ctx.user_id, conta.id, patch)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let extra = ctx
            .state
            .payment_service
            .apply_payment(ctx.user_id, conta.id, dec!(100), date(2024, 1, 11))
            .await
            .unwrap();
        assert!(extra.conta_gerada.is_none());

        let sucessoras: Vec<_> = ctx
            .store
            .all_accounts()
            .into_iter()
            .filter(|a| a.conta_origem_id == Some(conta.id))
            .collect();
        assert_eq!(sucessoras.len(), 1);
    }

    #[tokio::test]
    async fn mirror_failure_does_not_undo_payment() {
        let ctx = TestContext::new();
        let conta = ctx.create_account(dec!(300), Recurrence::Mensal).await;
        ctx.store.fail_ledger_inserts(true);

        let outcome = ctx
            .state
            .payment_service
            .apply_payment(ctx.user_id, conta.id, dec!(300), date(2024, 1, 10))
            .await
            .unwrap();

        assert_eq!(outcome.conta.status, AccountStatus::Pago);
        assert!(outcome.transacao.is_none());
        assert_eq!(outcome.avisos, vec![PaymentWarning::MirrorFailed]);
        // A recorrência segue mesmo sem o espelhamento
        assert!(outcome.conta_gerada.is_some());
        assert_eq!(outcome.message_key(), "payment.mirror_failed");
    }

    #[tokio::test]
    async fn update_failure_aborts_before_side_effects() {
        let ctx = TestContext::new();
        let conta = ctx.create_account(dec!(300), Recurrence::Mensal).await;
        ctx.store.fail_account_updates(true);

        let result = ctx
            .state
            .payment_service
            .apply_payment(ctx.user_id, conta.id, dec!(300), date(2024, 1, 10))
            .await;

        assert!(matches!(result, Err(AppError::InternalServerError(_))));
        assert!(ctx.store.all_ledger().is_empty());
        assert_eq!(ctx.store.all_accounts().len(), 1);
        assert_eq!(ctx.store.all_accounts()[0].valor_pago, Decimal::ZERO);
    }

    #[tokio::test]
    async fn recurrence_failure_is_reported_as_warning() {
        let ctx = TestContext::new();
        let conta = ctx.create_account(dec!(300), Recurrence::Trimestral).await;
        ctx.store.fail_account_inserts(true);

        let outcome = ctx
            .state
            .payment_service
            .apply_payment(ctx.user_id, conta.id, dec!(300), date(2024, 1, 10))
            .await
            .unwrap();

        assert_eq!(outcome.conta.status, AccountStatus::Pago);
        assert!(outcome.transacao.is_some());
        assert!(outcome.conta_gerada.is_none());
        assert_eq!(outcome.avisos, vec![PaymentWarning::RecurrenceFailed]);
        assert_eq!(outcome.message_key(), "payment.recurrence_failed");
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected() {
        let ctx = TestContext::new();
        let conta = ctx.create_account(dec!(300), Recurrence::Unica).await;

        for valor in [dec!(0), dec!(-50)] {
            let err = ctx
                .state
                .payment_service
                .apply_payment(ctx.user_id, conta.id, valor, date(2024, 1, 10))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::ValidationError(_)));
        }
        assert!(ctx.store.all_ledger().is_empty());
    }

    #[tokio::test]
    async fn cancelled_account_cannot_be_paid() {
        let ctx = TestContext::new();
        let conta = ctx.create_account(dec!(300), Recurrence::Unica).await;
        ctx.state.account_service.cancel(ctx.user_id, conta.id).await.unwrap();

        let err = ctx
            .state
            .payment_service
            .apply_payment(ctx.user_id, conta.id, dec!(10), date(2024, 1, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn unknown_or_foreign_account_is_not_found() {
        let ctx = TestContext::new();
        let conta = ctx.create_account(dec!(300), Recurrence::Unica).await;
        let service = &ctx.state.payment_service;

        let err = service
            .apply_payment(Uuid::new_v4(), conta.id, dec!(10), date(2024, 1, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(Resource::Conta)));

        let err = service
            .apply_payment(ctx.user_id, Uuid::new_v4(), dec!(10), date(2024, 1, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(Resource::Conta)));
    }

    #[tokio::test]
    async fn status_paid_iff_fully_covered() {
        let ctx = TestContext::new();
        let service = &ctx.state.payment_service;

        for (valor, pagamentos) in [
            (dec!(100), vec![dec!(40), dec!(60)]),
            (dec!(99.99), vec![dec!(0.01), dec!(50), dec!(49.97)]),
            (dec!(10), vec![dec!(3), dec!(3), dec!(3), dec!(3)]),
        ] {
            let conta = ctx.create_account(valor, Recurrence::Unica).await;
            for pagamento in pagamentos {
                let outcome = service
                    .apply_payment(ctx.user_id, conta.id, pagamento, date(2024, 1, 10))
                    .await
                    .unwrap();
                assert_eq!(
                    outcome.conta.status == AccountStatus::Pago,
                    outcome.conta.valor_pago >= outcome.conta.valor
                );
            }
        }
    }

    #[tokio::test]
    async fn concurrent_payment_is_a_conflict() {
        let ctx = TestContext::new();
        let conta = ctx.create_account(dec!(300), Recurrence::Mensal).await;
        ctx.state
            .payment_service
            .apply_payment(ctx.user_id, conta.id, dec!(100), date(2024, 1, 5))
            .await
            .unwrap();

        let stale: Arc<dyn AccountStore> = Arc::new(StaleReads::new(ctx.store.clone()));
        let service = PaymentService::new(
            stale.clone(),
            ctx.mirror(),
            RecurrenceService::new(stale),
        );

        let err = service
            .apply_payment(ctx.user_id, conta.id, dec!(200), date(2024, 1, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict));

        // O primeiro pagamento não foi sobrescrito
        let gravada = ctx
            .state
            .account_service
            .get(ctx.user_id, conta.id, date(2024, 1, 1))
            .await
            .unwrap();
        assert_eq!(gravada.valor_pago, dec!(100));
        assert_eq!(ctx.store.all_ledger().len(), 1);
    }
}
