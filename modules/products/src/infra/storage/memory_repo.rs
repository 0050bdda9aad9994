use async_trait::async_trait;
use chrono::{DateTime, Utc};
use store::{InMemoryStore, SoftDelete, StoreError, Versioned};

use crate::contract::model::Product;
use crate::domain::repo::ProductsRepository;

impl Versioned for Product {
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

impl SoftDelete for Product {
    fn is_active(&self) -> bool {
        self.active
    }
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

/// Process-local repository used when no database is configured.
#[derive(Default)]
pub struct InMemoryProductsRepository {
    store: InMemoryStore<Product>,
}

impl InMemoryProductsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductsRepository for InMemoryProductsRepository {
    async fn insert(&self, product: Product) -> Result<Product, StoreError> {
        Ok(self.store.insert(product))
    }

    async fn insert_all(&self, products: Vec<Product>) -> Result<Vec<Product>, StoreError> {
        Ok(self.store.insert_all(products))
    }

    async fn get(&self, id: i64) -> Result<Product, StoreError> {
        self.store.get(id)
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.store.find(|p| p.sku.as_deref() == Some(sku)))
    }

    async fn update_if_version_matches(
        &self,
        id: i64,
        next: Product,
        expected_version: i64,
    ) -> Result<Product, StoreError> {
        self.store.update_if_version_matches(id, next, expected_version)
    }

    async fn mark_inactive(
        &self,
        id: i64,
        expected_version: i64,
        at: DateTime<Utc>,
    ) -> Result<Product, StoreError> {
        self.store
            .mark_inactive(id, expected_version, |p| p.updated_at = at)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.store.delete(id)
    }

    async fn scan(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.store.scan())
    }
}
