use std::str::FromStr;

use rust_decimal::Decimal;
use sea_orm::{ActiveValue::NotSet, Set};
use store::StoreError;

use crate::contract::model::{Order, OrderStatus};
use crate::infra::storage::entity::{ActiveModel, Model};

impl TryFrom<Model> for Order {
    type Error = StoreError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let total_price = Decimal::from_str(&m.total_price).map_err(|e| {
            StoreError::backend(format!("order {}: bad total '{}': {e}", m.id, m.total_price))
        })?;
        let status = OrderStatus::parse(&m.status).ok_or_else(|| {
            StoreError::backend(format!("order {}: bad status '{}'", m.id, m.status))
        })?;
        Ok(Order {
            id: m.id,
            user_id: m.user_id,
            product_id: m.product_id,
            quantity: m.quantity,
            total_price,
            status,
            shipping_address: m.shipping_address,
            notes: m.notes,
            version: m.version,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

pub fn new_row(o: &Order, version: i64) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        user_id: Set(o.user_id),
        product_id: Set(o.product_id),
        quantity: Set(o.quantity),
        total_price: Set(o.total_price.to_string()),
        status: Set(o.status.as_str().to_string()),
        shipping_address: Set(o.shipping_address.clone()),
        notes: Set(o.notes.clone()),
        version: Set(version),
        created_at: Set(o.created_at),
        updated_at: Set(o.updated_at),
    }
}

pub fn changed_row(o: &Order, version: i64) -> ActiveModel {
    ActiveModel {
        created_at: NotSet,
        ..new_row(o, version)
    }
}
