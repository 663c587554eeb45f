// src/handlers/clientes_fornecedores.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::counterparty::{Counterparty, CounterpartyFilter, CounterpartyPatch, NewCounterparty},
};

// GET /api/clientes-fornecedores
#[utoipa::path(
    get,
    path = "/api/clientes-fornecedores",
    tag = "Clientes e Fornecedores",
    params(CounterpartyFilter),
    responses(
        (status = 200, description = "Lista ordenada por nome", body = Vec<Counterparty>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_counterparties(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filter): Query<CounterpartyFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let lista = app_state
        .counterparty_service
        .list(user.id, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(lista)))
}

// POST /api/clientes-fornecedores
#[utoipa::path(
    post,
    path = "/api/clientes-fornecedores",
    tag = "Clientes e Fornecedores",
    request_body = NewCounterparty,
    responses(
        (status = 201, description = "Cliente/fornecedor criado", body = Counterparty),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_counterparty(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<NewCounterparty>,
) -> Result<impl IntoResponse, ApiError> {
    let criado = app_state
        .counterparty_service
        .create(user.id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(criado)))
}

// GET /api/clientes-fornecedores/{id}
#[utoipa::path(
    get,
    path = "/api/clientes-fornecedores/{id}",
    tag = "Clientes e Fornecedores",
    params(("id" = Uuid, Path, description = "ID do cliente/fornecedor")),
    responses(
        (status = 200, description = "Cliente/fornecedor", body = Counterparty),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_counterparty(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let encontrado = app_state
        .counterparty_service
        .get(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(encontrado)))
}

// PATCH /api/clientes-fornecedores/{id}
#[utoipa::path(
    patch,
    path = "/api/clientes-fornecedores/{id}",
    tag = "Clientes e Fornecedores",
    params(("id" = Uuid, Path, description = "ID do cliente/fornecedor")),
    request_body = CounterpartyPatch,
    responses(
        (status = 200, description = "Atualizado", body = Counterparty),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_counterparty(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CounterpartyPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let atualizado = app_state
        .counterparty_service
        .update(user.id, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(atualizado)))
}

// DELETE /api/clientes-fornecedores/{id}
#[utoipa::path(
    delete,
    path = "/api/clientes-fornecedores/{id}",
    tag = "Clientes e Fornecedores",
    params(("id" = Uuid, Path, description = "ID do cliente/fornecedor")),
    responses(
        (status = 200, description = "Desativado (exclusão lógica)", body = Counterparty),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn deactivate_counterparty(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let desativado = app_state
        .counterparty_service
        .deactivate(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(desativado)))
}
