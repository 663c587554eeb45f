// src/db/memory_repo.rs

//! Implementação em memória dos stores, usada pelos testes. Reproduz o
//! escopo por usuário, a ordenação e o update condicional do Postgres.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        account_repo::{AccountStore, PaymentRecord},
        category_repo::CategoryStore,
        counterparty_repo::CounterpartyStore,
        ledger_repo::LedgerStore,
        user_repo::UserStore,
    },
    models::{
        account::{Account, AccountFilter},
        auth::User,
        category::Category,
        counterparty::{Counterparty, CounterpartyFilter},
        ledger::{LedgerFilter, LedgerTransaction},
    },
};

#[derive(Default)]
pub struct MemoryStore {
    accounts: Mutex<Vec<Account>>,
    counterparties: Mutex<Vec<Counterparty>>,
    ledger: Mutex<Vec<LedgerTransaction>>,
    categories: Mutex<Vec<Category>>,
    users: Mutex<Vec<User>>,

    // Injeção de falhas
    fail_ledger_inserts: AtomicBool,
    fail_account_inserts: AtomicBool,
    fail_account_updates: AtomicBool,
}

fn unavailable(what: &str) -> AppError {
    AppError::InternalServerError(anyhow::anyhow!("{} indisponível (falha simulada)", what))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_ledger_inserts(&self, fail: bool) {
        self.fail_ledger_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_account_inserts(&self, fail: bool) {
        self.fail_account_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_account_updates(&self, fail: bool) {
        self.fail_account_updates.store(fail, Ordering::SeqCst);
    }

    pub fn all_accounts(&self) -> Vec<Account> {
        self.accounts.lock().unwrap().clone()
    }

    pub fn all_ledger(&self) -> Vec<LedgerTransaction> {
        self.ledger.lock().unwrap().clone()
    }

    /// Cadastra um usuário sem passar pelo bcrypt.
    pub fn add_user(&self, email: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &AccountFilter,
        today: NaiveDate,
    ) -> Result<Vec<Account>, AppError> {
        let mut accounts: Vec<Account> = self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id && filter.matches(a, today))
            .cloned()
            .collect();
        accounts.sort_by(|a, b| {
            b.data_vencimento
                .cmp(&a.data_vencimento)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(accounts)
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Account>, AppError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id && a.user_id == user_id)
            .cloned())
    }

    async fn insert(&self, account: &Account) -> Result<Account, AppError> {
        if self.fail_account_inserts.load(Ordering::SeqCst) {
            return Err(unavailable("contas"));
        }
        self.accounts.lock().unwrap().push(account.clone());
        Ok(account.clone())
    }

    async fn save(&self, account: &Account) -> Result<Option<Account>, AppError> {
        let mut accounts = self.accounts.lock().unwrap();
        let Some(stored) = accounts.iter_mut().find(|a| {
            a.id == account.id && a.user_id == account.user_id && a.valor_pago == account.valor_pago
        }) else {
            return Ok(None);
        };

        // Mesmas colunas do UPDATE do Postgres
        stored.descricao = account.descricao.clone();
        stored.valor = account.valor;
        stored.status = account.status;
        stored.data_vencimento = account.data_vencimento;
        stored.recorrencia = account.recorrencia;
        stored.data_proxima_recorrencia = account.data_proxima_recorrencia;
        stored.category_id = account.category_id;
        stored.cliente_fornecedor_id = account.cliente_fornecedor_id;
        stored.numero_documento = account.numero_documento.clone();
        stored.observacoes = account.observacoes.clone();
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn record_payment(
        &self,
        user_id: Uuid,
        id: Uuid,
        record: PaymentRecord,
    ) -> Result<Option<Account>, AppError> {
        if self.fail_account_updates.load(Ordering::SeqCst) {
            return Err(unavailable("contas"));
        }
        let mut accounts = self.accounts.lock().unwrap();
        let Some(stored) = accounts.iter_mut().find(|a| {
            a.id == id && a.user_id == user_id && a.valor_pago == record.expected_paid
        }) else {
            return Ok(None);
        };

        stored.valor_pago = record.valor_pago;
        stored.status = record.status;
        stored.data_pagamento = Some(record.data_pagamento);
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut accounts = self.accounts.lock().unwrap();
        let before = accounts.len();
        accounts.retain(|a| !(a.id == id && a.user_id == user_id));
        Ok(accounts.len() < before)
    }
}

#[async_trait]
impl CounterpartyStore for MemoryStore {
    async fn list(&self, user_id: Uuid, filter: &CounterpartyFilter) -> Result<Vec<Counterparty>, AppError> {
        let mut counterparties: Vec<Counterparty> = self
            .counterparties
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id && filter.matches(c))
            .cloned()
            .collect();
        counterparties.sort_by(|a, b| a.nome.cmp(&b.nome));
        Ok(counterparties)
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Counterparty>, AppError> {
        Ok(self
            .counterparties
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id && c.user_id == user_id)
            .cloned())
    }

    async fn insert(&self, counterparty: &Counterparty) -> Result<Counterparty, AppError> {
        self.counterparties.lock().unwrap().push(counterparty.clone());
        Ok(counterparty.clone())
    }

    async fn save(&self, counterparty: &Counterparty) -> Result<Option<Counterparty>, AppError> {
        let mut counterparties = self.counterparties.lock().unwrap();
        let Some(stored) = counterparties
            .iter_mut()
            .find(|c| c.id == counterparty.id && c.user_id == counterparty.user_id)
        else {
            return Ok(None);
        };
        *stored = Counterparty {
            created_at: stored.created_at,
            updated_at: Utc::now(),
            ..counterparty.clone()
        };
        Ok(Some(stored.clone()))
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn insert(&self, transacao: &LedgerTransaction) -> Result<LedgerTransaction, AppError> {
        if self.fail_ledger_inserts.load(Ordering::SeqCst) {
            return Err(unavailable("transacoes"));
        }
        self.ledger.lock().unwrap().push(transacao.clone());
        Ok(transacao.clone())
    }

    async fn list(&self, user_id: Uuid, filter: &LedgerFilter) -> Result<Vec<LedgerTransaction>, AppError> {
        let mut transacoes: Vec<LedgerTransaction> = self
            .ledger
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id && filter.matches(t))
            .cloned()
            .collect();
        transacoes.sort_by(|a, b| b.quando.cmp(&a.quando).then(b.created_at.cmp(&a.created_at)));
        Ok(transacoes)
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn insert(&self, category: &Category) -> Result<Category, AppError> {
        self.categories.lock().unwrap().push(category.clone());
        Ok(category.clone())
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<Category>, AppError> {
        let mut categories: Vec<Category> = self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.nome.cmp(&b.nome));
        Ok(categories)
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Category>, AppError> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id && c.user_id == user_id)
            .cloned())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::EmailAlreadyExists);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }
}
