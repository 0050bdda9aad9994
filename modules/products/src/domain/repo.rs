use async_trait::async_trait;
use chrono::{DateTime, Utc};
use store::StoreError;

use crate::contract::model::Product;

/// Port for the domain layer: persistence operations the domain needs.
/// Implemented in memory and on SeaORM (see `infra::storage`).
#[async_trait]
pub trait ProductsRepository: Send + Sync {
    /// Persist a new product; the store assigns `id` and the initial version.
    async fn insert(&self, product: Product) -> Result<Product, StoreError>;

    /// Persist every product or none of them.
    async fn insert_all(&self, products: Vec<Product>) -> Result<Vec<Product>, StoreError>;

    async fn get(&self, id: i64) -> Result<Product, StoreError>;

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError>;

    /// Compare-and-swap on `version`; the stored copy gets `expected_version + 1`.
    async fn update_if_version_matches(
        &self,
        id: i64,
        next: Product,
        expected_version: i64,
    ) -> Result<Product, StoreError>;

    /// Soft delete through the same version check as any update.
    async fn mark_inactive(
        &self,
        id: i64,
        expected_version: i64,
        at: DateTime<Utc>,
    ) -> Result<Product, StoreError>;

    /// Hard delete.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Every stored product in insertion order.
    async fn scan(&self) -> Result<Vec<Product>, StoreError>;
}
