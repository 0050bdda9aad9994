use async_trait::async_trait;

use crate::contract::{
    error::ApiObjectsError,
    model::{ApiObject, ApiObjectInput},
};

/// Public API of the api_objects module for in-process consumers.
#[async_trait]
pub trait ApiObjectsApi: Send + Sync {
    async fn get_object(&self, id: i64) -> Result<ApiObject, ApiObjectsError>;

    async fn search_by_name(&self, name: &str) -> Result<Vec<ApiObject>, ApiObjectsError>;

    async fn create_object(&self, input: ApiObjectInput) -> Result<ApiObject, ApiObjectsError>;
}
