use async_trait::async_trait;
use chrono::{DateTime, Utc};
use store::{InMemoryStore, SoftDelete, StoreError, Versioned};

use crate::contract::model::User;
use crate::domain::repo::UsersRepository;

impl Versioned for User {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn version(&self) -> i64 {
        self.version
    }
    fn set_version(&mut self, version: i64) {
        self.version = version;
    }
}

impl SoftDelete for User {
    fn is_active(&self) -> bool {
        self.active
    }
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

#[derive(Default)]
pub struct InMemoryUsersRepository {
    store: InMemoryStore<User>,
}

impl InMemoryUsersRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsersRepository for InMemoryUsersRepository {
    async fn insert(&self, user: User) -> Result<User, StoreError> {
        Ok(self.store.insert(user))
    }

    async fn insert_all(&self, users: Vec<User>) -> Result<Vec<User>, StoreError> {
        Ok(self.store.insert_all(users))
    }

    async fn get(&self, id: i64) -> Result<User, StoreError> {
        self.store.get(id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.store.find(|u| u.email == email))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.store.find(|u| u.username == username))
    }

    async fn update_if_version_matches(
        &self,
        id: i64,
        next: User,
        expected_version: i64,
    ) -> Result<User, StoreError> {
        self.store.update_if_version_matches(id, next, expected_version)
    }

    async fn mark_inactive(
        &self,
        id: i64,
        expected_version: i64,
        at: DateTime<Utc>,
    ) -> Result<User, StoreError> {
        self.store
            .mark_inactive(id, expected_version, |u| u.updated_at = at)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.store.delete(id)
    }

    async fn scan(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.store.scan())
    }
}
