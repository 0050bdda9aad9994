//! SeaORM-backed orders repository. Updates are conditional on the stored
//! version (`WHERE id = ? AND version = ?`).

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};
use store::{StoreError, INITIAL_VERSION};
use tracing::debug;

use crate::contract::model::Order;
use crate::domain::repo::OrdersRepository;
use crate::infra::storage::entity::{Column, Entity as OrderEntity};
use crate::infra::storage::mapper::{changed_row, new_row};

fn db_err(context: &str) -> impl FnOnce(DbErr) -> StoreError + '_ {
    move |e| StoreError::backend(format!("{context}: {e}"))
}

pub struct SeaOrmOrdersRepository {
    conn: DatabaseConnection,
}

impl SeaOrmOrdersRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl OrdersRepository for SeaOrmOrdersRepository {
    async fn insert(&self, order: Order) -> Result<Order, StoreError> {
        let saved = new_row(&order, INITIAL_VERSION)
            .insert(&self.conn)
            .await
            .map_err(db_err("insert failed"))?;
        Order::try_from(saved)
    }

    async fn get(&self, id: i64) -> Result<Order, StoreError> {
        OrderEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(db_err("find_by_id failed"))?
            .ok_or(StoreError::NotFound { id })
            .and_then(Order::try_from)
    }

    async fn update_if_version_matches(
        &self,
        id: i64,
        next: Order,
        expected_version: i64,
    ) -> Result<Order, StoreError> {
        let res = OrderEntity::update_many()
            .set(changed_row(&next, expected_version + 1))
            .filter(Column::Id.eq(id))
            .filter(Column::Version.eq(expected_version))
            .exec(&self.conn)
            .await
            .map_err(db_err("update failed"))?;

        if res.rows_affected == 0 {
            let current = OrderEntity::find_by_id(id)
                .one(&self.conn)
                .await
                .map_err(db_err("version lookup failed"))?;
            return match current {
                None => Err(StoreError::NotFound { id }),
                Some(row) => {
                    debug!(id, expected_version, actual = row.version, "version check failed");
                    Err(StoreError::Conflict {
                        id,
                        expected: expected_version,
                        actual: row.version,
                    })
                }
            };
        }
        self.get(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let res = OrderEntity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .map_err(db_err("delete failed"))?;
        if res.rows_affected == 0 {
            return Err(StoreError::NotFound { id });
        }
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Order>, StoreError> {
        OrderEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .map_err(db_err("scan failed"))?
            .into_iter()
            .map(Order::try_from)
            .collect()
    }
}
