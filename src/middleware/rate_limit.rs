// src/middleware/rate_limit.rs

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{extract::State, middleware::Next, response::Response};
use moka::future::Cache;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
};

/// Contadores de requisições por chave. A janela é responsabilidade do store.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Incrementa o contador da chave e devolve o valor já incrementado.
    async fn hit(&self, key: &str) -> u32;
}

/// Janela fixa: o contador nasce com a primeira requisição e expira
/// `window` depois, junto com a entrada do cache.
pub struct MokaRateLimitStore {
    counters: Cache<String, Arc<AtomicU32>>,
}

impl MokaRateLimitStore {
    pub fn new(window: Duration, max_keys: u64) -> Self {
        let counters = Cache::builder()
            .max_capacity(max_keys)
            .time_to_live(window)
            .build();
        Self { counters }
    }
}

#[async_trait]
impl RateLimitStore for MokaRateLimitStore {
    async fn hit(&self, key: &str) -> u32 {
        let counter = self
            .counters
            .get_with(key.to_string(), async { Arc::new(AtomicU32::new(0)) })
            .await;
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, max_requests: u32) -> Self {
        Self {
            store,
            max_requests,
        }
    }

    pub async fn check(&self, key: &str) -> Result<(), AppError> {
        let count = self.store.hit(key).await;
        if count > self.max_requests {
            tracing::warn!(chave = key, count, "Limite de requisições excedido");
            return Err(AppError::TooManyRequests);
        }
        Ok(())
    }
}

// Roda depois do auth_guard: a chave é o usuário autenticado
pub async fn rate_limit_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    request: axum::extract::Request,
    next: Next,
) -> Result<Response, ApiError> {
    app_state
        .rate_limiter
        .check(&user.id.to_string())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(next.run(request).await)
}
