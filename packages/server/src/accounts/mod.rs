//! User accounts and their persistence.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entity::user;
use crate::persistence::StoreError;

pub use memory::MemoryAccountStore;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: i32,
    pub email: String,
    pub username: String,
    /// Argon2id PHC string. Never serialized into responses.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Fields of an account about to be created.
#[derive(Clone, Debug)]
pub struct NewAccount {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Persistence for user accounts. Email and username are each unique.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError>;
}

/// [`AccountStore`] backed by the `user` table.
#[derive(Clone)]
pub struct SeaOrmAccountStore {
    db: DatabaseConnection,
}

impl SeaOrmAccountStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for SeaOrmAccountStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, StoreError> {
        Ok(user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Account::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(Account::from))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .map(Account::from))
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let new_user = user::ActiveModel {
            email: Set(account.email),
            username: Set(account.username),
            password: Set(account.password_hash),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        Ok(new_user.insert(&self.db).await?.into())
    }
}

impl From<user::Model> for Account {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            username: model.username,
            password_hash: model.password,
            created_at: model.created_at,
        }
    }
}
