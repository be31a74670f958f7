use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::models::Account;

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Option<Account>;

    /// Adds an account with a freshly assigned id. The duplicate check and
    /// the insert happen under one write lock, so two concurrent
    /// registrations of the same username cannot both succeed.
    async fn insert(&self, username: &str, password_hash: &str) -> Result<Account, StoreError>;

    async fn count(&self) -> usize;
}

struct Inner {
    accounts: Vec<Account>,
    next_id: i64,
}

pub struct MemoryAccountStore {
    inner: RwLock<Inner>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                accounts: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_username(&self, username: &str) -> Option<Account> {
        self.inner
            .read()
            .await
            .accounts
            .iter()
            .find(|a| a.username == username)
            .cloned()
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.accounts.iter().any(|a| a.username == username) {
            return Err(StoreError::DuplicateUsername);
        }

        let account = Account {
            id: inner.next_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        inner.next_id += 1;
        inner.accounts.push(account.clone());

        Ok(account)
    }

    async fn count(&self) -> usize {
        self.inner.read().await.accounts.len()
    }
}
