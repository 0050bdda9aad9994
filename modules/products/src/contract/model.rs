use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Pure product model for inter-module communication (no serde).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i64,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub tags: BTreeSet<String>,
    /// `false` once soft-deleted; the row is kept.
    pub active: bool,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog attributes introduced by the v2 API.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogFields {
    pub sku: String,
    pub category: String,
    pub tags: Vec<String>,
}

/// Data for creating a product or replacing its editable fields.
///
/// `price` and `stock` stay optional here so that a missing value is
/// reported as a validation failure rather than a decoding error.
/// `catalog: None` (v1 callers) leaves SKU, category and tags untouched on update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub catalog: Option<CatalogFields>,
}

/// Search criteria for the v2 product search. Unset fields add no predicate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub tag: Option<String>,
    pub in_stock: Option<bool>,
    /// Defaults to `true`.
    pub active_only: Option<bool>,
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn of(stock: i64, low_threshold: i64) -> Self {
        if stock <= 0 {
            Self::OutOfStock
        } else if stock < low_threshold {
            Self::LowStock
        } else {
            Self::InStock
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InStock => "IN_STOCK",
            Self::LowStock => "LOW_STOCK",
            Self::OutOfStock => "OUT_OF_STOCK",
        }
    }
}

/// Catalog-wide figures. Everything except the three counters at the top is
/// computed over active products only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductStats {
    pub total_products: u64,
    pub active_products: u64,
    pub inactive_products: u64,
    pub total_categories: u64,
    pub products_by_category: BTreeMap<String, u64>,
    pub average_price: Decimal,
    pub max_price: Decimal,
    pub min_price: Decimal,
    pub total_stock: i64,
    pub out_of_stock_count: u64,
    pub low_stock_count: u64,
}
