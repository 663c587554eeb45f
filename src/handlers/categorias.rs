// src/handlers/categorias.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::category::{Category, NewCategory},
};

// GET /api/categorias
#[utoipa::path(
    get,
    path = "/api/categorias",
    tag = "Categorias",
    responses(
        (status = 200, description = "Categorias do usuário", body = Vec<Category>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let categorias = app_state
        .category_service
        .list(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(categorias)))
}

// POST /api/categorias
#[utoipa::path(
    post,
    path = "/api/categorias",
    tag = "Categorias",
    request_body = NewCategory,
    responses(
        (status = 201, description = "Categoria criada", body = Category),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<NewCategory>,
) -> Result<impl IntoResponse, ApiError> {
    let categoria = app_state
        .category_service
        .create(user.id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(categoria)))
}
