// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        AccountStore, CategoryStore, CounterpartyStore, LedgerStore, PgAccountRepository,
        PgCategoryRepository, PgCounterpartyRepository, PgLedgerRepository, PgUserRepository,
        UserStore,
    },
    middleware::rate_limit::{MokaRateLimitStore, RateLimiter},
    services::{
        account_service::AccountService, auth::AuthService, category_service::CategoryService,
        counterparty_service::CounterpartyService, ledger_service::LedgerService,
        mirror_service::TransactionMirror, payment_service::PaymentService,
        recurrence_service::RecurrenceService,
    },
};

// Quantos usuários distintos o rate limiter acompanha ao mesmo tempo
const RATE_LIMIT_MAX_KEYS: u64 = 10_000;

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub database_max_connections: u32,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window: Duration,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            rate_limit_max_requests: parse_or("RATE_LIMIT_MAX_REQUESTS", 60)?,
            rate_limit_window: Duration::from_secs(parse_or("RATE_LIMIT_WINDOW_SECS", 60)?),
        })
    }

    pub fn rate_limiter(&self) -> RateLimiter {
        let store = MokaRateLimitStore::new(self.rate_limit_window, RATE_LIMIT_MAX_KEYS);
        RateLimiter::new(Arc::new(store), self.rate_limit_max_requests)
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} tem um valor inválido: {}", key, raw)),
        Err(_) => Ok(default),
    }
}

pub async fn connect_pool(settings: &Settings) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.database_max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&settings.database_url)
        .await
        .context("Falha ao conectar ao banco de dados")?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
    Ok(pool)
}

/// Implementações de persistência usadas pelos serviços.
#[derive(Clone)]
pub struct Stores {
    pub accounts: Arc<dyn AccountStore>,
    pub counterparties: Arc<dyn CounterpartyStore>,
    pub ledger: Arc<dyn LedgerStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            accounts: Arc::new(PgAccountRepository::new(pool.clone())),
            counterparties: Arc::new(PgCounterpartyRepository::new(pool.clone())),
            ledger: Arc::new(PgLedgerRepository::new(pool.clone())),
            categories: Arc::new(PgCategoryRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool)),
        }
    }

    #[cfg(test)]
    pub fn memory(store: Arc<crate::db::MemoryStore>) -> Self {
        Self {
            accounts: store.clone(),
            counterparties: store.clone(),
            ledger: store.clone(),
            categories: store.clone(),
            users: store,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub account_service: AccountService,
    pub payment_service: PaymentService,
    pub recurrence_service: RecurrenceService,
    pub counterparty_service: CounterpartyService,
    pub category_service: CategoryService,
    pub ledger_service: LedgerService,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    // --- Monta o gráfico de dependências ---
    pub fn build(stores: Stores, jwt_secret: String, rate_limiter: RateLimiter) -> Self {
        let recurrence_service = RecurrenceService::new(stores.accounts.clone());
        let mirror = TransactionMirror::new(stores.ledger.clone(), stores.counterparties.clone());

        Self {
            auth_service: AuthService::new(stores.users.clone(), jwt_secret),
            account_service: AccountService::new(
                stores.accounts.clone(),
                stores.categories.clone(),
                stores.counterparties.clone(),
            ),
            payment_service: PaymentService::new(
                stores.accounts.clone(),
                mirror,
                recurrence_service.clone(),
            ),
            recurrence_service,
            counterparty_service: CounterpartyService::new(stores.counterparties.clone()),
            category_service: CategoryService::new(stores.categories.clone()),
            ledger_service: LedgerService::new(stores.ledger, stores.categories),
            rate_limiter,
        }
    }
}
