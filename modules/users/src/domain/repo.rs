use async_trait::async_trait;
use chrono::{DateTime, Utc};
use store::StoreError;

use crate::contract::model::User;

/// Port for the domain layer: persistence operations the domain needs.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn insert(&self, user: User) -> Result<User, StoreError>;

    /// Persist every user or none of them.
    async fn insert_all(&self, users: Vec<User>) -> Result<Vec<User>, StoreError>;

    async fn get(&self, id: i64) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn update_if_version_matches(
        &self,
        id: i64,
        next: User,
        expected_version: i64,
    ) -> Result<User, StoreError>;

    async fn mark_inactive(
        &self,
        id: i64,
        expected_version: i64,
        at: DateTime<Utc>,
    ) -> Result<User, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    async fn scan(&self) -> Result<Vec<User>, StoreError>;
}
