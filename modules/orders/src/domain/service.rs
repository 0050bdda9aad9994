use std::sync::Arc;

use chrono::Utc;
use query_core::{execute, FieldErrors, Filter, Page, PageRequest, SortDir, SortFields, SortValue};
use tracing::{debug, info, instrument};

use crate::contract::model::{Order, OrderInput, OrderListQuery, OrderStatus};
use crate::domain::error::DomainError;
use crate::domain::repo::OrdersRepository;
use crate::domain::validation::{validate_input, STATUS_MESSAGE};

const DEFAULT_SORT_FIELD: &str = "createdAt";
const DEFAULT_SORT_DIRECTION: &str = "desc";

#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn OrdersRepository>,
    config: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

fn sort_fields() -> SortFields<Order> {
    SortFields::<Order>::new()
        .field("id", |o| SortValue::Int(o.id))
        .field("userId", |o| SortValue::Int(o.user_id))
        .field("productId", |o| SortValue::Int(o.product_id))
        .field("quantity", |o| SortValue::Int(o.quantity))
        .field("totalPrice", |o| SortValue::Decimal(o.total_price))
        .field("status", |o| SortValue::text(o.status.as_str()))
        .field("createdAt", |o| SortValue::Time(o.created_at))
        .field("updatedAt", |o| SortValue::Time(o.updated_at))
}

fn parse_status(raw: &str) -> Result<OrderStatus, DomainError> {
    OrderStatus::parse(raw)
        .ok_or_else(|| DomainError::validation(FieldErrors::single("status", STATUS_MESSAGE)))
}

impl Service {
    pub fn new(repo: Arc<dyn OrdersRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    #[instrument(name = "orders.service.list_orders", skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, DomainError> {
        Ok(self.repo.scan().await?)
    }

    /// Sorted page over every order.
    #[instrument(name = "orders.service.list_page", skip(self))]
    pub async fn list_page(&self, query: OrderListQuery) -> Result<Page<Order>, DomainError> {
        let dir = SortDir::parse(query.sort_dir.as_deref().unwrap_or(DEFAULT_SORT_DIRECTION));
        let field = query
            .sort_by
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_SORT_FIELD);
        let order = sort_fields().resolve(field, dir)?;
        let request = PageRequest::new(
            query.page.unwrap_or(0),
            query
                .size
                .unwrap_or(i64::from(self.config.default_page_size)),
        )?
        .clamp_size(u64::from(self.config.max_page_size));

        let page = execute(
            self.repo.scan().await?,
            &Filter::<Order>::new(),
            Some(&order),
            request,
        );
        debug!(total = page.total_elements, "Listed orders");
        Ok(page)
    }

    #[instrument(name = "orders.service.get_order", skip(self), fields(order_id = id))]
    pub async fn get_order(&self, id: i64) -> Result<Order, DomainError> {
        Ok(self.repo.get(id).await?)
    }

    #[instrument(name = "orders.service.orders_for_user", skip(self))]
    pub async fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, DomainError> {
        let filter = Filter::<Order>::new().equals(Some(user_id), |o| o.user_id);
        self.select(filter).await
    }

    #[instrument(name = "orders.service.orders_with_status", skip(self))]
    pub async fn orders_with_status(&self, status: &str) -> Result<Vec<Order>, DomainError> {
        let status = parse_status(status)?;
        let filter = Filter::<Order>::new().equals(Some(status), |o| o.status);
        self.select(filter).await
    }

    async fn select(&self, filter: Filter<Order>) -> Result<Vec<Order>, DomainError> {
        let all = self.repo.scan().await?;
        Ok(all.into_iter().filter(|o| filter.matches(o)).collect())
    }

    #[instrument(name = "orders.service.create_order", skip(self, input))]
    pub async fn create_order(&self, input: OrderInput) -> Result<Order, DomainError> {
        info!("Creating new order");
        validate_input(&input)
            .into_result()
            .map_err(DomainError::validation)?;

        let now = Utc::now();
        let order = Order {
            id: 0,
            user_id: input.user_id.unwrap_or_default(),
            product_id: input.product_id.unwrap_or_default(),
            quantity: input.quantity.unwrap_or_default(),
            total_price: input.total_price.unwrap_or_default(),
            status: OrderStatus::Pending,
            shipping_address: input.shipping_address,
            notes: input.details.and_then(|d| d.notes),
            version: 0,
            created_at: now,
            updated_at: now,
        };
        let stored = self.repo.insert(order).await?;
        info!("Successfully created order with id={}", stored.id);
        Ok(stored)
    }

    #[instrument(name = "orders.service.update_order", skip(self, input), fields(order_id = id))]
    pub async fn update_order(
        &self,
        id: i64,
        input: OrderInput,
        expected_version: Option<i64>,
    ) -> Result<Order, DomainError> {
        info!("Updating order");
        validate_input(&input)
            .into_result()
            .map_err(DomainError::validation)?;

        let mut next = self.repo.get(id).await?;
        let expected = expected_version.unwrap_or(next.version);
        next.user_id = input.user_id.unwrap_or(next.user_id);
        next.product_id = input.product_id.unwrap_or(next.product_id);
        next.quantity = input.quantity.unwrap_or(next.quantity);
        next.total_price = input.total_price.unwrap_or(next.total_price);
        next.shipping_address = input.shipping_address;
        if let Some(details) = input.details {
            next.notes = details.notes;
        }
        next.updated_at = Utc::now();

        Ok(self
            .repo
            .update_if_version_matches(id, next, expected)
            .await?)
    }

    #[instrument(name = "orders.service.update_status", skip(self), fields(order_id = id))]
    pub async fn update_status(&self, id: i64, status: &str) -> Result<Order, DomainError> {
        let status = parse_status(status)?;
        info!(status = status.as_str(), "Changing order status");
        let mut next = self.repo.get(id).await?;
        let expected = next.version;
        next.status = status;
        next.updated_at = Utc::now();
        Ok(self
            .repo
            .update_if_version_matches(id, next, expected)
            .await?)
    }

    #[instrument(name = "orders.service.delete_order", skip(self), fields(order_id = id))]
    pub async fn delete_order(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting order");
        Ok(self.repo.delete(id).await?)
    }
}
