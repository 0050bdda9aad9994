use async_trait::async_trait;
use query_core::Page;

use crate::contract::{
    error::ProductsError,
    model::{Product, ProductInput, ProductQuery, ProductStats},
};

/// Public API of the products module for in-process consumers.
#[async_trait]
pub trait ProductsApi: Send + Sync {
    async fn get_product(&self, id: i64) -> Result<Product, ProductsError>;

    async fn get_product_by_sku(&self, sku: &str) -> Result<Product, ProductsError>;

    async fn search_products(&self, query: ProductQuery) -> Result<Page<Product>, ProductsError>;

    async fn create_product(&self, input: ProductInput) -> Result<Product, ProductsError>;

    /// `expected_version: None` commits against the version read just before.
    async fn update_product(
        &self,
        id: i64,
        input: ProductInput,
        expected_version: Option<i64>,
    ) -> Result<Product, ProductsError>;

    async fn deactivate_product(&self, id: i64) -> Result<(), ProductsError>;

    async fn statistics(&self) -> Result<ProductStats, ProductsError>;
}
