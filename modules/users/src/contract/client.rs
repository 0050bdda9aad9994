use async_trait::async_trait;
use query_core::Page;

use crate::contract::{
    error::UsersError,
    model::{User, UserInput, UserQuery, UserStats},
};

/// Public API of the users module for in-process consumers.
#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn get_user(&self, id: i64) -> Result<User, UsersError>;

    async fn get_user_by_email(&self, email: &str) -> Result<User, UsersError>;

    async fn search_users(&self, query: UserQuery) -> Result<Page<User>, UsersError>;

    async fn create_user(&self, input: UserInput) -> Result<User, UsersError>;

    async fn update_user(
        &self,
        id: i64,
        input: UserInput,
        expected_version: Option<i64>,
    ) -> Result<User, UsersError>;

    async fn deactivate_user(&self, id: i64) -> Result<(), UsersError>;

    async fn statistics(&self) -> Result<UserStats, UsersError>;
}
