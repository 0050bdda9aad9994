use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::contract::model::{Order, OrderDetails, OrderInput, OrderListQuery};

/// v1 representation (no notes, no version).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderV1Dto {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub status: String,
    pub shipping_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderV1Dto {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            product_id: o.product_id,
            quantity: o.quantity,
            total_price: o.total_price,
            status: o.status.as_str().to_string(),
            shipping_address: o.shipping_address,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderV1Req {
    pub user_id: Option<i64>,
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub total_price: Option<Decimal>,
    pub shipping_address: Option<String>,
}

impl From<OrderV1Req> for OrderInput {
    fn from(req: OrderV1Req) -> Self {
        Self {
            user_id: req.user_id,
            product_id: req.product_id,
            quantity: req.quantity,
            total_price: req.total_price,
            shipping_address: req.shipping_address,
            details: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub status: String,
    pub shipping_address: Option<String>,
    pub notes: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderDto {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            product_id: o.product_id,
            quantity: o.quantity,
            total_price: o.total_price,
            status: o.status.as_str().to_string(),
            shipping_address: o.shipping_address,
            notes: o.notes,
            version: o.version,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderReq {
    pub user_id: Option<i64>,
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub total_price: Option<Decimal>,
    pub shipping_address: Option<String>,
    pub notes: Option<String>,
    pub version: Option<i64>,
}

impl From<OrderReq> for OrderInput {
    fn from(req: OrderReq) -> Self {
        Self {
            user_id: req.user_id,
            product_id: req.product_id,
            quantity: req.quantity,
            total_price: req.total_price,
            shipping_address: req.shipping_address,
            details: Some(OrderDetails { notes: req.notes }),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderListParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

impl From<OrderListParams> for OrderListQuery {
    fn from(p: OrderListParams) -> Self {
        Self {
            page: p.page,
            size: p.size,
            sort_by: p.sort_by,
            sort_dir: p.sort_dir,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusParam {
    #[serde(default)]
    pub status: String,
}
