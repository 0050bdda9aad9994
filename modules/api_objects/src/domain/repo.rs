use async_trait::async_trait;
use store::StoreError;

use crate::contract::model::ApiObject;

/// Persistence operations the object service needs.
#[async_trait]
pub trait ApiObjectsRepository: Send + Sync {
    async fn insert(&self, object: ApiObject) -> Result<ApiObject, StoreError>;

    async fn get(&self, id: i64) -> Result<ApiObject, StoreError>;

    async fn update_if_version_matches(
        &self,
        id: i64,
        next: ApiObject,
        expected_version: i64,
    ) -> Result<ApiObject, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    async fn scan(&self) -> Result<Vec<ApiObject>, StoreError>;
}
