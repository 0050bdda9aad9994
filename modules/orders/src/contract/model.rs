use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Order lifecycle state. New orders start as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub shipping_address: Option<String>,
    pub notes: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields added by the v2 API.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderDetails {
    pub notes: Option<String>,
}

/// Data for placing an order or replacing its editable fields.
/// `details: None` (v1 callers) leaves the notes untouched on update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderInput {
    pub user_id: Option<i64>,
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
    pub total_price: Option<Decimal>,
    pub shipping_address: Option<String>,
    pub details: Option<OrderDetails>,
}

/// Paging and ordering for the v2 order listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}
