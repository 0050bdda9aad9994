//! SeaORM-backed implementation of the products repository port.
//!
//! The version check is part of the UPDATE statement itself
//! (`WHERE id = ? AND version = ?`), so two writers holding the same version
//! cannot both commit. A write that hits the unique SKU index comes back as
//! `StoreError::Duplicate`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use store::{StoreError, INITIAL_VERSION};
use tracing::debug;

use crate::contract::model::Product;
use crate::domain::repo::ProductsRepository;
use crate::infra::storage::entity::{Column, Entity as ProductEntity};
use crate::infra::storage::mapper::{changed_row, new_row};

fn db_err(context: &str) -> impl FnOnce(DbErr) -> StoreError + '_ {
    move |e| StoreError::backend(format!("{context}: {e}"))
}

/// Like [`db_err`], but reports a unique index violation as a duplicate SKU.
fn write_err<'a>(context: &'a str, sku: Option<&'a str>) -> impl FnOnce(DbErr) -> StoreError + 'a {
    move |e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            StoreError::duplicate("sku", sku.unwrap_or_default())
        }
        _ => db_err(context)(e),
    }
}

pub struct SeaOrmProductsRepository {
    conn: DatabaseConnection,
}

impl SeaOrmProductsRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn current_version(&self, id: i64) -> Result<Option<i64>, StoreError> {
        let row = ProductEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(db_err("version lookup failed"))?;
        Ok(row.map(|m| m.version))
    }
}

#[async_trait]
impl ProductsRepository for SeaOrmProductsRepository {
    async fn insert(&self, product: Product) -> Result<Product, StoreError> {
        let saved = new_row(&product, INITIAL_VERSION)
            .insert(&self.conn)
            .await
            .map_err(write_err("insert failed", product.sku.as_deref()))?;
        Product::try_from(saved)
    }

    async fn insert_all(&self, products: Vec<Product>) -> Result<Vec<Product>, StoreError> {
        let txn = self
            .conn
            .begin()
            .await
            .map_err(db_err("begin failed"))?;
        let mut stored = Vec::with_capacity(products.len());
        for p in &products {
            // Dropping `txn` on error rolls the batch back.
            let saved = new_row(p, INITIAL_VERSION)
                .insert(&txn)
                .await
                .map_err(write_err("bulk insert failed", p.sku.as_deref()))?;
            stored.push(Product::try_from(saved)?);
        }
        txn.commit().await.map_err(db_err("commit failed"))?;
        Ok(stored)
    }

    async fn get(&self, id: i64) -> Result<Product, StoreError> {
        ProductEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(db_err("find_by_id failed"))?
            .ok_or(StoreError::NotFound { id })
            .and_then(Product::try_from)
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError> {
        ProductEntity::find()
            .filter(Column::Sku.eq(sku))
            .one(&self.conn)
            .await
            .map_err(db_err("find_by_sku failed"))?
            .map(Product::try_from)
            .transpose()
    }

    async fn update_if_version_matches(
        &self,
        id: i64,
        next: Product,
        expected_version: i64,
    ) -> Result<Product, StoreError> {
        let res = ProductEntity::update_many()
            .set(changed_row(&next, expected_version + 1))
            .filter(Column::Id.eq(id))
            .filter(Column::Version.eq(expected_version))
            .exec(&self.conn)
            .await
            .map_err(write_err("update failed", next.sku.as_deref()))?;

        if res.rows_affected == 0 {
            return match self.current_version(id).await? {
                None => Err(StoreError::NotFound { id }),
                Some(actual) => {
                    debug!(id, expected_version, actual, "version check failed");
                    Err(StoreError::Conflict {
                        id,
                        expected: expected_version,
                        actual,
                    })
                }
            };
        }
        self.get(id).await
    }

    async fn mark_inactive(
        &self,
        id: i64,
        expected_version: i64,
        at: DateTime<Utc>,
    ) -> Result<Product, StoreError> {
        let res = ProductEntity::update_many()
            .col_expr(Column::Active, Expr::value(false))
            .col_expr(Column::UpdatedAt, Expr::value(at))
            .col_expr(Column::Version, Expr::value(expected_version + 1))
            .filter(Column::Id.eq(id))
            .filter(Column::Version.eq(expected_version))
            .exec(&self.conn)
            .await
            .map_err(db_err("soft delete failed"))?;

        if res.rows_affected == 0 {
            return match self.current_version(id).await? {
                None => Err(StoreError::NotFound { id }),
                Some(actual) => Err(StoreError::Conflict {
                    id,
                    expected: expected_version,
                    actual,
                }),
            };
        }
        self.get(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let res = ProductEntity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .map_err(db_err("delete failed"))?;
        if res.rows_affected == 0 {
            return Err(StoreError::NotFound { id });
        }
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Product>, StoreError> {
        ProductEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .map_err(db_err("scan failed"))?
            .into_iter()
            .map(Product::try_from)
            .collect()
    }
}
