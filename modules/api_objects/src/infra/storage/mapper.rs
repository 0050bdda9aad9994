use sea_orm::{ActiveValue::NotSet, Set};
use store::StoreError;

use crate::contract::model::ApiObject;
use crate::infra::storage::entity::{ActiveModel, Model};

impl TryFrom<Model> for ApiObject {
    type Error = StoreError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let data: Option<serde_json::Value> = m
            .data
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| StoreError::backend(format!("object {}: bad data: {e}", m.id)))?;
        Ok(ApiObject {
            id: m.id,
            name: m.name,
            data,
            version: m.version,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

pub fn new_row(o: &ApiObject, version: i64) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        name: Set(o.name.clone()),
        data: Set(o.data.as_ref().map(|v| v.to_string())),
        version: Set(version),
        created_at: Set(o.created_at),
        updated_at: Set(o.updated_at),
    }
}

pub fn changed_row(o: &ApiObject, version: i64) -> ActiveModel {
    ActiveModel {
        created_at: NotSet,
        ..new_row(o, version)
    }
}
