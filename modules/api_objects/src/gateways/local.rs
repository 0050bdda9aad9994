use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::ApiObjectsApi,
    error::ApiObjectsError,
    model::{ApiObject, ApiObjectInput},
};
use crate::domain::service::Service;

pub struct ApiObjectsLocalClient {
    service: Arc<Service>,
}

impl ApiObjectsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ApiObjectsApi for ApiObjectsLocalClient {
    async fn get_object(&self, id: i64) -> Result<ApiObject, ApiObjectsError> {
        self.service.get_object(id).await.map_err(Into::into)
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<ApiObject>, ApiObjectsError> {
        self.service.search_by_name(name).await.map_err(Into::into)
    }

    async fn create_object(&self, input: ApiObjectInput) -> Result<ApiObject, ApiObjectsError> {
        self.service.create_object(input).await.map_err(Into::into)
    }
}
