use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contract::model::{ApiObject, ApiObjectInput};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiObjectDto {
    pub id: i64,
    pub name: String,
    pub data: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApiObject> for ApiObjectDto {
    fn from(o: ApiObject) -> Self {
        Self {
            id: o.id,
            name: o.name,
            data: o.data,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

/// `data` may be any JSON value; `null` and absent are the same.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiObjectReq {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl From<ApiObjectReq> for ApiObjectInput {
    fn from(req: ApiObjectReq) -> Self {
        Self {
            name: req.name,
            data: req.data,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameQuery {
    #[serde(default)]
    pub name: String,
}
