use chrono::{DateTime, Utc};
use serde_json::Value;

/// A named object carrying an arbitrary JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiObject {
    pub id: i64,
    pub name: String,
    pub data: Option<Value>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiObjectInput {
    pub name: String,
    pub data: Option<Value>,
}
