use async_trait::async_trait;
use query_core::Page;
use std::sync::Arc;

use crate::contract::{
    client::ProductsApi,
    error::ProductsError,
    model::{Product, ProductInput, ProductQuery, ProductStats},
};
use crate::domain::service::Service;

/// Local implementation of the ProductsApi trait that delegates to the domain service
pub struct ProductsLocalClient {
    service: Arc<Service>,
}

impl ProductsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ProductsApi for ProductsLocalClient {
    async fn get_product(&self, id: i64) -> Result<Product, ProductsError> {
        self.service.get_product(id).await.map_err(Into::into)
    }

    async fn get_product_by_sku(&self, sku: &str) -> Result<Product, ProductsError> {
        self.service.get_product_by_sku(sku).await.map_err(Into::into)
    }

    async fn search_products(&self, query: ProductQuery) -> Result<Page<Product>, ProductsError> {
        self.service.search(query).await.map_err(Into::into)
    }

    async fn create_product(&self, input: ProductInput) -> Result<Product, ProductsError> {
        self.service.create_product(input).await.map_err(Into::into)
    }

    async fn update_product(
        &self,
        id: i64,
        input: ProductInput,
        expected_version: Option<i64>,
    ) -> Result<Product, ProductsError> {
        self.service
            .update_product(id, input, expected_version)
            .await
            .map_err(Into::into)
    }

    async fn deactivate_product(&self, id: i64) -> Result<(), ProductsError> {
        self.service.deactivate_product(id).await.map_err(Into::into)
    }

    async fn statistics(&self) -> Result<ProductStats, ProductsError> {
        self.service.statistics().await.map_err(Into::into)
    }
}
