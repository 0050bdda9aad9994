use sea_orm::{ActiveValue::NotSet, Set};
use store::StoreError;

use crate::contract::model::{Role, User, UserStatus};
use crate::infra::storage::entity::{ActiveModel, Model};

impl TryFrom<Model> for User {
    type Error = StoreError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let role = Role::parse(&m.role)
            .ok_or_else(|| StoreError::backend(format!("user {}: bad role '{}'", m.id, m.role)))?;
        let status = UserStatus::parse(&m.status).ok_or_else(|| {
            StoreError::backend(format!("user {}: bad status '{}'", m.id, m.status))
        })?;
        Ok(User {
            id: m.id,
            username: m.username,
            email: m.email,
            first_name: m.first_name,
            last_name: m.last_name,
            phone: m.phone,
            role,
            status,
            active: m.active,
            version: m.version,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

pub fn new_row(u: &User, version: i64) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        username: Set(u.username.clone()),
        email: Set(u.email.clone()),
        first_name: Set(u.first_name.clone()),
        last_name: Set(u.last_name.clone()),
        phone: Set(u.phone.clone()),
        role: Set(u.role.as_str().to_string()),
        status: Set(u.status.as_str().to_string()),
        active: Set(u.active),
        version: Set(version),
        created_at: Set(u.created_at),
        updated_at: Set(u.updated_at),
    }
}

pub fn changed_row(u: &User, version: i64) -> ActiveModel {
    ActiveModel {
        created_at: NotSet,
        ..new_row(u, version)
    }
}
