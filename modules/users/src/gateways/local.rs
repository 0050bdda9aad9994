use async_trait::async_trait;
use query_core::Page;
use std::sync::Arc;

use crate::contract::{
    client::UsersApi,
    error::UsersError,
    model::{User, UserInput, UserQuery, UserStats},
};
use crate::domain::service::Service;

/// Local implementation of the UsersApi trait that delegates to the domain service
pub struct UsersLocalClient {
    service: Arc<Service>,
}

impl UsersLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UsersApi for UsersLocalClient {
    async fn get_user(&self, id: i64) -> Result<User, UsersError> {
        self.service.get_user(id).await.map_err(Into::into)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, UsersError> {
        self.service.get_user_by_email(email).await.map_err(Into::into)
    }

    async fn search_users(&self, query: UserQuery) -> Result<Page<User>, UsersError> {
        self.service.search(query).await.map_err(Into::into)
    }

    async fn create_user(&self, input: UserInput) -> Result<User, UsersError> {
        self.service.create_user(input).await.map_err(Into::into)
    }

    async fn update_user(
        &self,
        id: i64,
        input: UserInput,
        expected_version: Option<i64>,
    ) -> Result<User, UsersError> {
        self.service
            .update_user(id, input, expected_version)
            .await
            .map_err(Into::into)
    }

    async fn deactivate_user(&self, id: i64) -> Result<(), UsersError> {
        self.service.deactivate_user(id).await.map_err(Into::into)
    }

    async fn statistics(&self) -> Result<UserStats, UsersError> {
        self.service.statistics().await.map_err(Into::into)
    }
}
