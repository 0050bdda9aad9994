use async_trait::async_trait;
use store::{InMemoryStore, StoreError, Versioned};

use crate::contract::model::ApiObject;
use crate::domain::repo::ApiObjectsRepository;

impl Versioned for ApiObject {
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

#[derive(Default)]
pub struct InMemoryApiObjectsRepository {
    store: InMemoryStore<ApiObject>,
}

impl InMemoryApiObjectsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiObjectsRepository for InMemoryApiObjectsRepository {
    async fn insert(&self, object: ApiObject) -> Result<ApiObject, StoreError> {
        Ok(self.store.insert(object))
    }

    async fn get(&self, id: i64) -> Result<ApiObject, StoreError> {
        self.store.get(id)
    }

    async fn update_if_version_matches(
        &self,
        id: i64,
        next: ApiObject,
        expected_version: i64,
    ) -> Result<ApiObject, StoreError> {
        self.store.update_if_version_matches(id, next, expected_version)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.store.delete(id)
    }

    async fn scan(&self) -> Result<Vec<ApiObject>, StoreError> {
        Ok(self.store.scan())
    }
}
