use async_trait::async_trait;
use store::StoreError;

use crate::contract::model::Order;

/// Port for the domain layer: persistence operations the domain needs.
#[async_trait]
pub trait OrdersRepository: Send + Sync {
    async fn insert(&self, order: Order) -> Result<Order, StoreError>;

    async fn get(&self, id: i64) -> Result<Order, StoreError>;

    async fn update_if_version_matches(
        &self,
        id: i64,
        next: Order,
        expected_version: i64,
    ) -> Result<Order, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    async fn scan(&self) -> Result<Vec<Order>, StoreError>;
}
