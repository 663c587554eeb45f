// src/common/error.rs

use std::collections::HashMap;
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::translate;
use crate::middleware::i18n::Locale;

/// Entidades que podem não existir (ou pertencer a outro usuário).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Conta,
    Contraparte,
    Categoria,
    Usuario,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Conta => "conta",
            Resource::Contraparte => "cliente_fornecedor",
            Resource::Categoria => "categoria",
            Resource::Usuario => "usuario",
        };
        f.write_str(name)
    }
}

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Nunca diferencia "não existe" de "é de outro usuário"
    #[error("Registro não encontrado: {0}")]
    NotFound(Resource),

    #[error("Conflito de concorrência")]
    Conflict,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Limite de requisições excedido")]
    TooManyRequests,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Erro já pronto para virar resposta HTTP.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let lang = locale.lang();

        if let AppError::ValidationError(errors) = self {
            // Retorna todos os detalhes da validação, campo -> mensagens
            let mut details: HashMap<String, Vec<String>> = HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                details.insert(field.to_string(), messages);
            }
            return ApiError {
                status: StatusCode::BAD_REQUEST,
                error: translate("errors.validation", lang).to_string(),
                details: Some(json!(details)),
            };
        }

        let (status, key) = match self {
            AppError::NotFound(resource) => (StatusCode::NOT_FOUND, not_found_key(*resource)),
            AppError::Conflict => (StatusCode::CONFLICT, "errors.conflict"),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "errors.email_exists"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "errors.invalid_credentials"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "errors.invalid_token"),
            AppError::TooManyRequests => (StatusCode::TOO_MANY_REQUESTS, "errors.too_many_requests"),

            // Todos os outros erros viram 500. O detalhe fica só no log.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "errors.internal")
            }
        };

        ApiError {
            status,
            error: translate(key, lang).to_string(),
            details: None,
        }
    }

    /// Erro de validação de um único campo, para regras que o `validator`
    /// não expressa (ex.: valores decimais positivos).
    pub fn invalid_field(field: &'static str, code: &'static str, message: &'static str) -> Self {
        let mut errors = validator::ValidationErrors::new();
        errors.add(field, field_error(code, message));
        AppError::ValidationError(errors)
    }
}

pub fn field_error(code: &'static str, message: &'static str) -> validator::ValidationError {
    let mut error = validator::ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn not_found_key(resource: Resource) -> &'static str {
    match resource {
        Resource::Conta => "errors.not_found.conta",
        Resource::Contraparte => "errors.not_found.contraparte",
        Resource::Categoria => "errors.not_found.categoria",
        Resource::Usuario => "errors.not_found.usuario",
    }
}
