use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::contract::model::{
    CatalogFields, Product, ProductInput, ProductQuery, ProductStats, StockStatus,
};

// ---------------------------------------------------------------- v1

/// v1 representation: the original catalog fields only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductV1Dto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductV1Req {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub stock: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameSearchQuery {
    #[serde(default)]
    pub name: String,
}

impl From<Product> for ProductV1Dto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            stock: p.stock,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<ProductV1Req> for ProductInput {
    fn from(req: ProductV1Req) -> Self {
        Self {
            name: req.name,
            description: req.description,
            price: req.price,
            stock: req.stock,
            catalog: None,
        }
    }
}

// ---------------------------------------------------------------- v2

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i64,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub active: bool,
    pub version: i64,
    pub stock_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductDto {
    pub fn new(p: Product, status: StockStatus) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            stock: p.stock,
            sku: p.sku,
            category: p.category,
            tags: p.tags.into_iter().collect(),
            active: p.active,
            version: p.version,
            stock_status: status.as_str().to_string(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Create/update body. `version`, when sent on update, must match the stored one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReq {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub version: Option<i64>,
}

impl From<ProductReq> for ProductInput {
    fn from(req: ProductReq) -> Self {
        Self {
            name: req.name,
            description: req.description,
            price: req.price,
            stock: req.stock,
            catalog: Some(CatalogFields {
                sku: req.sku,
                category: req.category,
                tags: req.tags,
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkProductReq {
    #[serde(default)]
    pub products: Vec<ProductReq>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductSearchReq {
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub min_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub max_price: Option<Decimal>,
    pub tag: Option<String>,
    pub in_stock: Option<bool>,
    pub active_only: Option<bool>,
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
}

impl From<ProductSearchReq> for ProductQuery {
    fn from(req: ProductSearchReq) -> Self {
        Self {
            name: req.name,
            category: req.category,
            min_price: req.min_price,
            max_price: req.max_price,
            tag: req.tag,
            in_stock: req.in_stock,
            active_only: req.active_only,
            page: req.page,
            size: req.size,
            sort_by: req.sort_by,
            sort_direction: req.sort_direction,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStatsDto {
    pub total_products: u64,
    pub active_products: u64,
    pub inactive_products: u64,
    pub total_categories: u64,
    pub products_by_category: BTreeMap<String, u64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_price: Decimal,
    pub total_stock: i64,
    pub out_of_stock_count: u64,
    pub low_stock_count: u64,
}

impl From<ProductStats> for ProductStatsDto {
    fn from(s: ProductStats) -> Self {
        Self {
            total_products: s.total_products,
            active_products: s.active_products,
            inactive_products: s.inactive_products,
            total_categories: s.total_categories,
            products_by_category: s.products_by_category,
            average_price: s.average_price,
            max_price: s.max_price,
            min_price: s.min_price,
            total_stock: s.total_stock,
            out_of_stock_count: s.out_of_stock_count,
            low_stock_count: s.low_stock_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuDto {
    pub sku: String,
}
