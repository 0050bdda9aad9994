use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use sea_orm::{ActiveValue::NotSet, Set};
use store::StoreError;

use crate::contract::model::Product;
use crate::infra::storage::entity::{ActiveModel, Model};

impl TryFrom<Model> for Product {
    type Error = StoreError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let price = Decimal::from_str(&m.price)
            .map_err(|e| StoreError::backend(format!("product {}: bad price '{}': {e}", m.id, m.price)))?;
        let tags: BTreeSet<String> = serde_json::from_str(&m.tags)
            .map_err(|e| StoreError::backend(format!("product {}: bad tags: {e}", m.id)))?;
        Ok(Product {
            id: m.id,
            name: m.name,
            description: m.description,
            price,
            stock: m.stock,
            sku: m.sku,
            category: m.category,
            tags,
            active: m.active,
            version: m.version,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

fn tags_json(tags: &BTreeSet<String>) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

/// Row for INSERT: the database assigns the id.
pub fn new_row(p: &Product, version: i64) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        name: Set(p.name.clone()),
        description: Set(p.description.clone()),
        price: Set(p.price.to_string()),
        stock: Set(p.stock),
        sku: Set(p.sku.clone()),
        category: Set(p.category.clone()),
        tags: Set(tags_json(&p.tags)),
        active: Set(p.active),
        version: Set(version),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    }
}

/// Column values for a conditional UPDATE; the key stays out of the SET list.
pub fn changed_row(p: &Product, version: i64) -> ActiveModel {
    ActiveModel {
        created_at: NotSet,
        ..new_row(p, version)
    }
}
