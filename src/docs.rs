// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Contas ---
        handlers::contas::list_contas,
        handlers::contas::create_conta,
        handlers::contas::get_conta,
        handlers::contas::update_conta,
        handlers::contas::delete_conta,
        handlers::contas::pay_conta,
        handlers::contas::stop_recurrence,
        handlers::contas::cancel_conta,

        // --- Clientes e Fornecedores ---
        handlers::clientes_fornecedores::list_counterparties,
        handlers::clientes_fornecedores::create_counterparty,
        handlers::clientes_fornecedores::get_counterparty,
        handlers::clientes_fornecedores::update_counterparty,
        handlers::clientes_fornecedores::deactivate_counterparty,

        // --- Categorias ---
        handlers::categorias::list_categories,
        handlers::categorias::create_category,

        // --- Transações ---
        handlers::transacoes::list_transactions,
        handlers::transacoes::create_transaction,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Contas ---
            models::account::AccountKind,
            models::account::AccountStatus,
            models::account::Recurrence,
            models::account::Account,
            models::account::NewAccount,
            models::account::AccountPatch,

            // --- Pagamentos ---
            models::payment::PaymentPayload,
            models::payment::PaymentWarning,
            models::payment::PaymentOutcome,
            models::payment::PaymentResponse,

            // --- Clientes e Fornecedores ---
            models::counterparty::CounterpartyKind,
            models::counterparty::Counterparty,
            models::counterparty::NewCounterparty,
            models::counterparty::CounterpartyPatch,

            // --- Categorias ---
            models::category::Category,
            models::category::NewCategory,

            // --- Transações ---
            models::ledger::LedgerKind,
            models::ledger::LedgerTransaction,
            models::ledger::NewLedgerTransaction,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Contas", description = "Contas a Pagar e a Receber, Pagamentos e Recorrência"),
        (name = "Clientes e Fornecedores", description = "Cadastro de Contrapartes"),
        (name = "Categorias", description = "Categorias de Receita e Despesa"),
        (name = "Transações", description = "Livro Caixa")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
