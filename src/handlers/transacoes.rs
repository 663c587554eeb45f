// src/handlers/transacoes.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::ledger::{LedgerFilter, LedgerTransaction, NewLedgerTransaction},
};

// GET /api/transacoes
#[utoipa::path(
    get,
    path = "/api/transacoes",
    tag = "Transações",
    params(LedgerFilter),
    responses(
        (status = 200, description = "Lançamentos do livro caixa, mais recentes primeiro", body = Vec<LedgerTransaction>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filter): Query<LedgerFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let transacoes = app_state
        .ledger_service
        .list(user.id, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(transacoes)))
}

// POST /api/transacoes
#[utoipa::path(
    post,
    path = "/api/transacoes",
    tag = "Transações",
    request_body = NewLedgerTransaction,
    responses(
        (status = 201, description = "Lançamento criado", body = LedgerTransaction),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Categoria inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<NewLedgerTransaction>,
) -> Result<impl IntoResponse, ApiError> {
    let transacao = app_state
        .ledger_service
        .create(user.id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(transacao)))
}
