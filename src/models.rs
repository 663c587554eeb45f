pub mod account;
pub mod auth;
pub mod category;
pub mod counterparty;
pub mod ledger;
pub mod payment;
