pub mod user_repo;
pub use user_repo::{PgUserRepository, UserStore};
pub mod account_repo;
pub use account_repo::{AccountStore, PaymentRecord, PgAccountRepository};
pub mod counterparty_repo;
pub use counterparty_repo::{CounterpartyStore, PgCounterpartyRepository};
pub mod ledger_repo;
pub use ledger_repo::{LedgerStore, PgLedgerRepository};
pub mod category_repo;
pub use category_repo::{CategoryStore, PgCategoryRepository};

#[cfg(test)]
pub mod memory_repo;
#[cfg(test)]
pub use memory_repo::MemoryStore;
