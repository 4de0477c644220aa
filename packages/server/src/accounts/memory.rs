use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Account, AccountStore, NewAccount};
use crate::persistence::StoreError;

/// In-process [`AccountStore`].
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<Vec<Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.username == username).cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(StoreError::Conflict("user_email_key".into()));
        }
        if accounts.iter().any(|a| a.username == account.username) {
            return Err(StoreError::Conflict("user_username_key".into()));
        }

        let account = Account {
            id: accounts.len() as i32 + 1,
            email: account.email,
            username: account.username,
            password_hash: account.password_hash,
            created_at: Utc::now(),
        };
        accounts.push(account.clone());
        Ok(account)
    }
}
