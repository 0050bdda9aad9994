use async_trait::async_trait;
use query_core::Page;
use std::sync::Arc;

use crate::contract::{
    client::OrdersApi,
    error::OrdersError,
    model::{Order, OrderInput, OrderListQuery},
};
use crate::domain::service::Service;

pub struct OrdersLocalClient {
    service: Arc<Service>,
}

impl OrdersLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl OrdersApi for OrdersLocalClient {
    async fn get_order(&self, id: i64) -> Result<Order, OrdersError> {
        self.service.get_order(id).await.map_err(Into::into)
    }

    async fn list_orders(&self, query: OrderListQuery) -> Result<Page<Order>, OrdersError> {
        self.service.list_page(query).await.map_err(Into::into)
    }

    async fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrdersError> {
        self.service.orders_for_user(user_id).await.map_err(Into::into)
    }

    async fn create_order(&self, input: OrderInput) -> Result<Order, OrdersError> {
        self.service.create_order(input).await.map_err(Into::into)
    }

    async fn update_status(&self, id: i64, status: &str) -> Result<Order, OrdersError> {
        self.service.update_status(id, status).await.map_err(Into::into)
    }
}
