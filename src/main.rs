//src/main.rs

use anyhow::Context;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

#[cfg(test)]
mod test_utils;

use crate::config::{AppState, Settings, Stores};
use crate::docs::ApiDoc;
use crate::middleware::{auth::auth_guard, rate_limit::rate_limit_guard};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar
    let settings = Settings::from_env()?;
    let pool = config::connect_pool(&settings).await?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados.")?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app_state = AppState::build(
        Stores::postgres(pool),
        settings.jwt_secret.clone(),
        settings.rate_limiter(),
    );
    let app = build_router(app_state);

    let listener = TcpListener::bind(&settings.bind_addr)
        .await
        .context("Falha ao iniciar o listener TCP")?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Erro no servidor Axum")?;
    Ok(())
}

pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login));

    let contas_routes = Router::new()
        .route(
            "/api/contas",
            get(handlers::contas::list_contas).post(handlers::contas::create_conta),
        )
        .route(
            "/api/contas/{id}",
            get(handlers::contas::get_conta)
                .patch(handlers::contas::update_conta)
                .delete(handlers::contas::delete_conta),
        )
        .route("/api/contas/{id}/pagamentos", post(handlers::contas::pay_conta))
        .route(
            "/api/contas/{id}/parar-recorrencia",
            post(handlers::contas::stop_recurrence),
        )
        .route("/api/contas/{id}/cancelar", post(handlers::contas::cancel_conta));

    let cadastro_routes = Router::new()
        .route(
            "/api/clientes-fornecedores",
            get(handlers::clientes_fornecedores::list_counterparties)
                .post(handlers::clientes_fornecedores::create_counterparty),
        )
        .route(
            "/api/clientes-fornecedores/{id}",
            get(handlers::clientes_fornecedores::get_counterparty)
                .patch(handlers::clientes_fornecedores::update_counterparty)
                .delete(handlers::clientes_fornecedores::deactivate_counterparty),
        )
        .route(
            "/api/categorias",
            get(handlers::categorias::list_categories).post(handlers::categorias::create_category),
        )
        .route(
            "/api/transacoes",
            get(handlers::transacoes::list_transactions)
                .post(handlers::transacoes::create_transaction),
        );

    // Tudo abaixo exige token. O auth_guard roda primeiro (última camada),
    // e o rate limit usa o usuário que ele resolveu.
    let protected_routes = Router::new()
        .route("/api/users/me", get(handlers::auth::get_me))
        .merge(contas_routes)
        .merge(cadastro_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            rate_limit_guard,
        ))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(auth_routes)
        .merge(protected_routes)
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
