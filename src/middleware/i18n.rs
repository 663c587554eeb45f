// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::i18n::Lang;

const DEFAULT_LANG: &str = "pt";

// Nosso extrator de idioma
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl Locale {
    pub fn lang(&self) -> Lang {
        Lang::from_tag(&self.0)
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let lang = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .first() // Pega o primeiro idioma (ex: "pt-BR")
                    .map(|tag_string| {
                        // "pt-BR" -> "pt"
                        tag_string.split('-').next().unwrap_or(tag_string).to_lowercase()
                    })
            });

        Ok(lang.map(Locale).unwrap_or_default())
    }
}
