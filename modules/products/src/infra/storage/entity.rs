use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// `price` is kept as decimal text and `tags` as a JSON array so that the
/// table round-trips exactly on SQLite.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub stock: i64,
    #[sea_orm(unique)]
    pub sku: Option<String>,
    pub category: Option<String>,
    pub tags: String,
    pub active: bool,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
