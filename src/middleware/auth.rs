// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::User,
};

// O middleware em si: valida o Bearer e deixa o usuário nos extensions
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();

    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|_| AppError::InvalidToken.to_api_error(&locale))?;

    let user = app_state
        .auth_service
        .validate_token(bearer.token())
        .await
        .map_err(|e| match e {
            // Token de usuário apagado não é "não encontrado", é token inválido
            AppError::NotFound(_) => AppError::InvalidToken.to_api_error(&locale),
            e => e.to_api_error(&locale),
        })?;

    parts.extensions.insert(user);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<User>().cloned() {
            return Ok(AuthenticatedUser(user));
        }
        let locale = Locale::from_request_parts(parts, state)
            .await
            .unwrap_or_default();
        Err(AppError::InvalidToken.to_api_error(&locale))
    }
}
