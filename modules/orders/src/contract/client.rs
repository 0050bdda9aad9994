use async_trait::async_trait;
use query_core::Page;

use crate::contract::{
    error::OrdersError,
    model::{Order, OrderInput, OrderListQuery},
};

/// Public API of the orders module for in-process consumers.
#[async_trait]
pub trait OrdersApi: Send + Sync {
    async fn get_order(&self, id: i64) -> Result<Order, OrdersError>;

    async fn list_orders(&self, query: OrderListQuery) -> Result<Page<Order>, OrdersError>;

    async fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrdersError>;

    async fn create_order(&self, input: OrderInput) -> Result<Order, OrdersError>;

    async fn update_status(&self, id: i64, status: &str) -> Result<Order, OrdersError>;
}
