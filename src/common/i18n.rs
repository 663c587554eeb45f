// src/common/i18n.rs

/// Idiomas com mensagens traduzidas. Qualquer outro cai no português.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    Pt,
    En,
}

impl Lang {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "en" => Lang::En,
            _ => Lang::Pt,
        }
    }
}

/// Busca a mensagem pela chave. Chave desconhecida devolve a própria chave,
/// assim a falta de tradução aparece no teste e não derruba a requisição.
pub fn translate(key: &'static str, lang: Lang) -> &'static str {
    match (key, lang) {
        ("errors.validation", Lang::Pt) => "Um ou mais campos são inválidos.",
        ("errors.validation", Lang::En) => "One or more fields are invalid.",

        ("errors.not_found.conta", Lang::Pt) => "Conta não encontrada.",
        ("errors.not_found.conta", Lang::En) => "Account not found.",
        ("errors.not_found.contraparte", Lang::Pt) => "Cliente/fornecedor não encontrado.",
        ("errors.not_found.contraparte", Lang::En) => "Client/supplier not found.",
        ("errors.not_found.categoria", Lang::Pt) => "Categoria não encontrada.",
        ("errors.not_found.categoria", Lang::En) => "Category not found.",
        ("errors.not_found.usuario", Lang::Pt) => "Usuário não encontrado.",
        ("errors.not_found.usuario", Lang::En) => "User not found.",

        ("errors.conflict", Lang::Pt) => {
            "A conta foi alterada em outra sessão. Recarregue e tente novamente."
        }
        ("errors.conflict", Lang::En) => {
            "The account was changed by another session. Reload and try again."
        }
        ("errors.email_exists", Lang::Pt) => "Este e-mail já está em uso.",
        ("errors.email_exists", Lang::En) => "This e-mail is already in use.",
        ("errors.invalid_credentials", Lang::Pt) => "E-mail ou senha inválidos.",
        ("errors.invalid_credentials", Lang::En) => "Invalid e-mail or password.",
        ("errors.invalid_token", Lang::Pt) => "Token de autenticação inválido ou ausente.",
        ("errors.invalid_token", Lang::En) => "Missing or invalid authentication token.",
        ("errors.too_many_requests", Lang::Pt) => {
            "Muitas requisições. Aguarde um pouco e tente novamente."
        }
        ("errors.too_many_requests", Lang::En) => "Too many requests. Please wait and retry.",
        ("errors.internal", Lang::Pt) => "Ocorreu um erro inesperado.",
        ("errors.internal", Lang::En) => "An unexpected error occurred.",

        ("payment.recorded", Lang::Pt) => "Pagamento registrado com sucesso.",
        ("payment.recorded", Lang::En) => "Payment recorded successfully.",
        ("payment.recorded_with_successor", Lang::Pt) => {
            "Pagamento registrado. A próxima ocorrência foi gerada."
        }
        ("payment.recorded_with_successor", Lang::En) => {
            "Payment recorded. The next occurrence was generated."
        }
        ("payment.mirror_failed", Lang::Pt) => {
            "Pagamento registrado, mas a transação automática não pôde ser criada."
        }
        ("payment.mirror_failed", Lang::En) => {
            "Payment recorded, but automatic transaction could not be created."
        }
        ("payment.recurrence_failed", Lang::Pt) => {
            "Pagamento registrado, mas a próxima ocorrência não pôde ser gerada."
        }
        ("payment.recurrence_failed", Lang::En) => {
            "Payment recorded, but the next occurrence could not be generated."
        }
        ("payment.recurrence_skipped", Lang::Pt) => {
            "Pagamento registrado. A conta é recorrente, mas não tem próxima data de vencimento."
        }
        ("payment.recurrence_skipped", Lang::En) => {
            "Payment recorded. The account is recurring but has no next due date."
        }

        (key, _) => key,
    }
}
