// src/test_utils.rs

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    build_router,
    common::error::AppError,
    config::{AppState, Stores},
    db::{AccountStore, CategoryStore, MemoryStore, PaymentRecord},
    middleware::rate_limit::{MokaRateLimitStore, RateLimiter},
    models::{
        account::{Account, AccountFilter, AccountKind, AccountStatus, NewAccount, Recurrence},
        category::Category,
        counterparty::{Counterparty, CounterpartyKind, NewCounterparty},
        ledger::LedgerKind,
    },
    services::mirror_service::TransactionMirror,
};

const TEST_JWT_SECRET: &str = "segredo-de-teste";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn new_account(
    tipo: AccountKind,
    valor: Decimal,
    data_vencimento: NaiveDate,
    recorrencia: Recurrence,
) -> NewAccount {
    NewAccount {
        tipo: Some(tipo),
        descricao: Some("Aluguel do escritório".into()),
        valor: Some(valor),
        data_vencimento: Some(data_vencimento),
        recorrencia,
        ..Default::default()
    }
}

/// Estado da aplicação sobre o store em memória, com um usuário já
/// cadastrado.
pub struct TestContext {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub user_id: Uuid,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_rate_limit(1_000)
    }

    pub fn with_rate_limit(max_requests: u32) -> Self {
        let store = Arc::new(MemoryStore::new());
        let user = store.add_user("teste@exemplo.com");
        let rate_limiter = RateLimiter::new(
            Arc::new(MokaRateLimitStore::new(Duration::from_secs(60), 100)),
            max_requests,
        );
        let state = AppState::build(
            Stores::memory(store.clone()),
            TEST_JWT_SECRET.to_string(),
            rate_limiter,
        );

        Self {
            state,
            store,
            user_id: user.id,
        }
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(build_router(self.state.clone())).unwrap()
    }

    pub fn token(&self) -> String {
        self.token_for(self.user_id)
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        self.state.auth_service.create_token(user_id).unwrap()
    }

    pub fn mirror(&self) -> TransactionMirror {
        TransactionMirror::new(self.store.clone(), self.store.clone())
    }

    /// Conta a pagar com vencimento em 2024-01-10.
    pub async fn create_account(&self, valor: Decimal, recorrencia: Recurrence) -> Account {
        self.state
            .account_service
            .create(
                self.user_id,
                new_account(AccountKind::Pagar, valor, date(2024, 1, 10), recorrencia),
            )
            .await
            .unwrap()
    }

    pub async fn category_for(&self, user_id: Uuid) -> Category {
        let category = Category {
            id: Uuid::new_v4(),
            user_id,
            nome: "Moradia".into(),
            tipo: LedgerKind::Despesa,
            cor: None,
            created_at: Utc::now(),
        };
        CategoryStore::insert(self.store.as_ref(), &category).await.unwrap()
    }

    pub async fn counterparty(&self, nome: &str, tipo: CounterpartyKind) -> Counterparty {
        self.state
            .counterparty_service
            .create(
                self.user_id,
                NewCounterparty {
                    nome: nome.into(),
                    tipo,
                    documento: None,
                    email: None,
                    telefone: None,
                    endereco: None,
                    observacoes: None,
                },
            )
            .await
            .unwrap()
    }
}

/// Store de contas cujo `find` devolve a conta como estava antes de qualquer
/// pagamento, como se outra sessão tivesse pagado entre a leitura e a
/// gravação. As gravações vão para o `MemoryStore` de verdade.
pub struct StaleReads {
    inner: Arc<MemoryStore>,
}

impl StaleReads {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl AccountStore for StaleReads {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &AccountFilter,
        today: NaiveDate,
    ) -> Result<Vec<Account>, AppError> {
        AccountStore::list(self.inner.as_ref(), user_id, filter, today).await
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Account>, AppError> {
        let found = AccountStore::find(self.inner.as_ref(), user_id, id).await?;
        Ok(found.map(|a| Account {
            valor_pago: Decimal::ZERO,
            status: AccountStatus::Pendente,
            data_pagamento: None,
            ..a
        }))
    }

    async fn insert(&self, account: &Account) -> Result<Account, AppError> {
        AccountStore::insert(self.inner.as_ref(), account).await
    }

    async fn save(&self, account: &Account) -> Result<Option<Account>, AppError> {
        AccountStore::save(self.inner.as_ref(), account).await
    }

    async fn record_payment(
        &self,
        user_id: Uuid,
        id: Uuid,
        record: PaymentRecord,
    ) -> Result<Option<Account>, AppError> {
        self.inner.record_payment(user_id, id, record).await
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        AccountStore::delete(self.inner.as_ref(), user_id, id).await
    }
}
