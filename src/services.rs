pub mod account_service;
pub mod auth;
pub mod category_service;
pub mod counterparty_service;
pub mod ledger_service;
pub mod mirror_service;
pub mod payment_service;
pub mod recurrence_service;
