use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::contract::model::{AccessFields, User, UserInput, UserQuery, UserStats};

// ---------------------------------------------------------------- v1

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserV1Dto {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserV1Dto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            phone: u.phone,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserV1Req {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

impl From<UserV1Req> for UserInput {
    fn from(req: UserV1Req) -> Self {
        Self {
            username: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            access: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsernameSearchQuery {
    #[serde(default)]
    pub username: String,
}

// ---------------------------------------------------------------- v2

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub status: String,
    pub active: bool,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            phone: u.phone,
            role: u.role.as_str().to_string(),
            status: u.status.as_str().to_string(),
            active: u.active,
            version: u.version,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Create/update body. `version`, when sent on update, must match the stored one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserReq {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub active: Option<bool>,
    pub version: Option<i64>,
}

impl From<UserReq> for UserInput {
    fn from(req: UserReq) -> Self {
        Self {
            username: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            access: Some(AccessFields {
                role: req.role,
                status: req.status,
                active: req.active,
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkUserReq {
    #[serde(default)]
    pub users: Vec<UserReq>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSearchReq {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub active: Option<bool>,
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
}

impl From<UserSearchReq> for UserQuery {
    fn from(req: UserSearchReq) -> Self {
        Self {
            username: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            role: req.role,
            status: req.status,
            active: req.active,
            page: req.page,
            size: req.size,
            sort_by: req.sort_by,
            sort_direction: req.sort_direction,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsDto {
    pub total_users: u64,
    pub active_users: u64,
    pub inactive_users: u64,
    pub users_by_role: BTreeMap<String, u64>,
    pub users_by_status: BTreeMap<String, u64>,
}

impl From<UserStats> for UserStatsDto {
    fn from(s: UserStats) -> Self {
        Self {
            total_users: s.total_users,
            active_users: s.active_users,
            inactive_users: s.inactive_users,
            users_by_role: s.users_by_role,
            users_by_status: s.users_by_status,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernameSeedQuery {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernameDto {
    pub username: String,
}
