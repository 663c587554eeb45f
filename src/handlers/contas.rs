// src/handlers/contas.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::{error::ApiError, i18n::translate},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        account::{Account, AccountFilter, AccountPatch, NewAccount},
        payment::{PaymentPayload, PaymentResponse},
    },
};

// GET /api/contas
#[utoipa::path(
    get,
    path = "/api/contas",
    tag = "Contas",
    params(AccountFilter),
    responses(
        (status = 200, description = "Contas do usuário, vencimento mais recente primeiro", body = Vec<Account>),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_contas(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filter): Query<AccountFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let today = Utc::now().date_naive();
    let contas = app_state
        .account_service
        .list(user.id, &filter, today)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(contas)))
}

// POST /api/contas
#[utoipa::path(
    post,
    path = "/api/contas",
    tag = "Contas",
    request_body = NewAccount,
    responses(
        (status = 201, description = "Conta criada", body = Account),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Categoria ou cliente/fornecedor inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_conta(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<NewAccount>,
) -> Result<impl IntoResponse, ApiError> {
    let conta = app_state
        .account_service
        .create(user.id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(conta)))
}

// GET /api/contas/{id}
#[utoipa::path(
    get,
    path = "/api/contas/{id}",
    tag = "Contas",
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 200, description = "Conta", body = Account),
        (status = 404, description = "Conta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_conta(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let conta = app_state
        .account_service
        .get(user.id, id, Utc::now().date_naive())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(conta)))
}

// PATCH /api/contas/{id}
#[utoipa::path(
    patch,
    path = "/api/contas/{id}",
    tag = "Contas",
    params(("id" = Uuid, Path, description = "ID da conta")),
    request_body = AccountPatch,
    responses(
        (status = 200, description = "Conta atualizada", body = Account),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Conta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_conta(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AccountPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let conta = app_state
        .account_service
        .update(user.id, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(conta.with_display_status(Utc::now().date_naive()))))
}

// DELETE /api/contas/{id}
#[utoipa::path(
    delete,
    path = "/api/contas/{id}",
    tag = "Contas",
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 204, description = "Conta excluída"),
        (status = 404, description = "Conta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_conta(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .account_service
        .delete(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/contas/{id}/pagamentos
#[utoipa::path(
    post,
    path = "/api/contas/{id}/pagamentos",
    tag = "Contas",
    params(("id" = Uuid, Path, description = "ID da conta")),
    request_body = PaymentPayload,
    responses(
        (status = 200, description = "Pagamento registrado (avisos indicam efeitos colaterais que falharam)", body = PaymentResponse),
        (status = 400, description = "Valor inválido ou conta cancelada"),
        (status = 404, description = "Conta não encontrada"),
        (status = 409, description = "Outro pagamento foi registrado ao mesmo tempo")
    ),
    security(("api_jwt" = []))
)]
pub async fn pay_conta(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let data_pagamento = payload
        .data_pagamento
        .unwrap_or_else(|| Utc::now().date_naive());

    let outcome = app_state
        .payment_service
        .apply_payment(user.id, id, payload.valor, data_pagamento)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let mensagem = translate(outcome.message_key(), locale.lang()).to_string();
    Ok((StatusCode::OK, Json(PaymentResponse { outcome, mensagem })))
}

// POST /api/contas/{id}/parar-recorrencia
#[utoipa::path(
    post,
    path = "/api/contas/{id}/parar-recorrencia",
    tag = "Contas",
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 200, description = "Recorrência interrompida", body = Account),
        (status = 404, description = "Conta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn stop_recurrence(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let conta = app_state
        .recurrence_service
        .stop_recurrence(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(conta.with_display_status(Utc::now().date_naive()))))
}

// POST /api/contas/{id}/cancelar
#[utoipa::path(
    post,
    path = "/api/contas/{id}/cancelar",
    tag = "Contas",
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 200, description = "Conta cancelada", body = Account),
        (status = 400, description = "Conta já paga"),
        (status = 404, description = "Conta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_conta(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let conta = app_state
        .account_service
        .cancel(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(conta)))
}
