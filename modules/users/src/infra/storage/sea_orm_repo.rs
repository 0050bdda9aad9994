//! SeaORM-backed users repository.
//!
//! Updates carry `WHERE id = ? AND version = ?`; username and email are
//! guarded by unique indexes, reported as `StoreError::Duplicate`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use store::{StoreError, INITIAL_VERSION};
use tracing::debug;

use crate::contract::model::User;
use crate::domain::repo::UsersRepository;
use crate::infra::storage::entity::{Column, Entity as UserEntity};
use crate::infra::storage::mapper::{changed_row, new_row};

fn db_err(context: &str) -> impl FnOnce(DbErr) -> StoreError + '_ {
    move |e| StoreError::backend(format!("{context}: {e}"))
}

/// The violated index is named in the driver message (`users.username`).
fn write_err<'a>(context: &'a str, user: &'a User) -> impl FnOnce(DbErr) -> StoreError + 'a {
    move |e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) if msg.contains("username") => {
            StoreError::duplicate("username", user.username.as_str())
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            StoreError::duplicate("email", user.email.as_str())
        }
        _ => db_err(context)(e),
    }
}

pub struct SeaOrmUsersRepository {
    conn: DatabaseConnection,
}

impl SeaOrmUsersRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn find_one(&self, column: Column, value: &str) -> Result<Option<User>, StoreError> {
        UserEntity::find()
            .filter(column.eq(value))
            .one(&self.conn)
            .await
            .map_err(db_err("lookup failed"))?
            .map(User::try_from)
            .transpose()
    }

    /// Explains a zero-row conditional write.
    async fn missed_write(&self, id: i64, expected_version: i64) -> StoreError {
        match UserEntity::find_by_id(id).one(&self.conn).await {
            Ok(None) => StoreError::NotFound { id },
            Ok(Some(row)) => {
                debug!(id, expected_version, actual = row.version, "version check failed");
                StoreError::Conflict {
                    id,
                    expected: expected_version,
                    actual: row.version,
                }
            }
            Err(e) => db_err("version lookup failed")(e),
        }
    }
}

#[async_trait]
impl UsersRepository for SeaOrmUsersRepository {
    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let saved = new_row(&user, INITIAL_VERSION)
            .insert(&self.conn)
            .await
            .map_err(write_err("insert failed", &user))?;
        User::try_from(saved)
    }

    async fn insert_all(&self, users: Vec<User>) -> Result<Vec<User>, StoreError> {
        let txn = self.conn.begin().await.map_err(db_err("begin failed"))?;
        let mut stored = Vec::with_capacity(users.len());
        for u in &users {
            let saved = new_row(u, INITIAL_VERSION)
                .insert(&txn)
                .await
                .map_err(write_err("bulk insert failed", u))?;
            stored.push(User::try_from(saved)?);
        }
        txn.commit().await.map_err(db_err("commit failed"))?;
        Ok(stored)
    }

    async fn get(&self, id: i64) -> Result<User, StoreError> {
        UserEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(db_err("find_by_id failed"))?
            .ok_or(StoreError::NotFound { id })
            .and_then(User::try_from)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.find_one(Column::Email, email).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.find_one(Column::Username, username).await
    }

    async fn update_if_version_matches(
        &self,
        id: i64,
        next: User,
        expected_version: i64,
    ) -> Result<User, StoreError> {
        let res = UserEntity::update_many()
            .set(changed_row(&next, expected_version + 1))
            .filter(Column::Id.eq(id))
            .filter(Column::Version.eq(expected_version))
            .exec(&self.conn)
            .await
            .map_err(write_err("update failed", &next))?;
        if res.rows_affected == 0 {
            return Err(self.missed_write(id, expected_version).await);
        }
        self.get(id).await
    }

    async fn mark_inactive(
        &self,
        id: i64,
        expected_version: i64,
        at: DateTime<Utc>,
    ) -> Result<User, StoreError> {
        let res = UserEntity::update_many()
            .col_expr(Column::Active, Expr::value(false))
            .col_expr(Column::UpdatedAt, Expr::value(at))
            .col_expr(Column::Version, Expr::value(expected_version + 1))
            .filter(Column::Id.eq(id))
            .filter(Column::Version.eq(expected_version))
            .exec(&self.conn)
            .await
            .map_err(db_err("soft delete failed"))?;
        if res.rows_affected == 0 {
            return Err(self.missed_write(id, expected_version).await);
        }
        self.get(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let res = UserEntity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .map_err(db_err("delete failed"))?;
        if res.rows_affected == 0 {
            return Err(StoreError::NotFound { id });
        }
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<User>, StoreError> {
        UserEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .map_err(db_err("scan failed"))?
            .into_iter()
            .map(User::try_from)
            .collect()
    }
}
