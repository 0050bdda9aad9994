use async_trait::async_trait;
use store::{InMemoryStore, StoreError, Versioned};

use crate::contract::model::Order;
use crate::domain::repo::OrdersRepository;

impl Versioned for Order {
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
pub struct InMemoryOrdersRepository {
    store: InMemoryStore<Order>,
}

impl InMemoryOrdersRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrdersRepository for InMemoryOrdersRepository {
    async fn insert(&self, order: Order) -> Result<Order, StoreError> {
        Ok(self.store.insert(order))
    }

    async fn get(&self, id: i64) -> Result<Order, StoreError> {
        self.store.get(id)
    }

    async fn update_if_version_matches(
        &self,
        id: i64,
        next: Order,
        expected_version: i64,
    ) -> Result<Order, StoreError> {
        self.store.update_if_version_matches(id, next, expected_version)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.store.delete(id)
    }

    async fn scan(&self) -> Result<Vec<Order>, StoreError> {
        Ok(self.store.scan())
    }
}
