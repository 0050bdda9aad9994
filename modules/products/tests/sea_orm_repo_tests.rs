use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use store::StoreError;

use products::{
    contract::model::{CatalogFields, Product, ProductInput, ProductQuery},
    domain::{
        error::DomainError,
        repo::ProductsRepository,
        service::{Service, ServiceConfig},
    },
    infra::storage::{migrations::Migrator, sea_orm_repo::SeaOrmProductsRepository},
};

/// Create a fresh test database for each test
async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

async fn create_test_repo() -> Arc<SeaOrmProductsRepository> {
    Arc::new(SeaOrmProductsRepository::new(create_test_db().await))
}

fn product(name: &str, sku: &str, tags: &[&str]) -> Product {
    let now = Utc::now();
    Product {
        id: 0,
        name: name.to_string(),
        description: None,
        price: "19.90".parse().unwrap(),
        stock: 7,
        sku: Some(sku.to_string()),
        category: Some("Books".to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
        active: true,
        version: 0,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn insert_and_read_back_all_columns() -> Result<()> {
    let repo = create_test_repo().await;
    let stored = repo.insert(product("Rust Book", "BOOK-00001", &["rust", "programming"])).await?;
    assert!(stored.id > 0);
    assert_eq!(stored.version, 0);

    let back = repo.get(stored.id).await?;
    assert_eq!(back.price, "19.90".parse::<Decimal>()?);
    assert!(back.tags.contains("rust"));
    assert_eq!(back.category.as_deref(), Some("Books"));

    let by_sku = repo.find_by_sku("BOOK-00001").await?;
    assert_eq!(by_sku.map(|p| p.id), Some(stored.id));
    assert!(repo.find_by_sku("BOOK-99999").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn conditional_update_checks_version() -> Result<()> {
    let repo = create_test_repo().await;
    let stored = repo.insert(product("Rust Book", "BOOK-00001", &[])).await?;

    let mut next = stored.clone();
    next.name = "Rust Book 2nd Ed".to_string();
    let updated = repo.update_if_version_matches(stored.id, next.clone(), 0).await?;
    assert_eq!(updated.version, 1);
    assert_eq!(updated.name, "Rust Book 2nd Ed");

    let err = repo
        .update_if_version_matches(stored.id, next.clone(), 0)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Conflict {
            expected: 0,
            actual: 1,
            ..
        }
    ));

    let missing = repo.update_if_version_matches(999, next, 0).await.unwrap_err();
    assert!(matches!(missing, StoreError::NotFound { id: 999 }));
    Ok(())
}

#[tokio::test]
async fn mark_inactive_and_delete() -> Result<()> {
    let repo = create_test_repo().await;
    let stored = repo.insert(product("Rust Book", "BOOK-00001", &[])).await?;

    let soft = repo.mark_inactive(stored.id, 0, Utc::now()).await?;
    assert!(!soft.active);
    assert_eq!(soft.version, 1);
    assert!(repo.mark_inactive(stored.id, 0, Utc::now()).await.is_err());

    repo.delete(stored.id).await?;
    assert!(matches!(
        repo.get(stored.id).await,
        Err(StoreError::NotFound { .. })
    ));
    assert!(matches!(
        repo.delete(stored.id).await,
        Err(StoreError::NotFound { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn failed_batch_leaves_no_rows() -> Result<()> {
    let repo = create_test_repo().await;
    let batch = vec![
        product("First", "BOOK-00001", &[]),
        product("Second", "BOOK-00002", &[]),
        product("Clash", "BOOK-00001", &[]),
    ];
    assert!(repo.insert_all(batch).await.is_err());
    assert!(repo.scan().await?.is_empty());

    let ok = repo
        .insert_all(vec![
            product("First", "BOOK-00001", &[]),
            product("Second", "BOOK-00002", &[]),
        ])
        .await?;
    assert_eq!(ok.len(), 2);
    let names: Vec<String> = repo.scan().await?.into_iter().map(|p| p.name).collect();
    assert_eq!(names, ["First", "Second"]);
    Ok(())
}

#[tokio::test]
async fn service_over_database() -> Result<()> {
    let repo = create_test_repo().await;
    let svc = Service::new(repo, ServiceConfig::default());

    let input = |name: &str, sku: &str, tag: &str| ProductInput {
        name: name.to_string(),
        description: None,
        price: Some("15.00".parse().unwrap()),
        stock: Some(3),
        catalog: Some(CatalogFields {
            sku: sku.to_string(),
            category: "Books".to_string(),
            tags: vec![tag.to_string()],
        }),
    };

    svc.bulk_create(vec![
        input("Rust Book", "BOOK-00001", "rust"),
        input("Go Book", "BOOK-00002", "go"),
    ])
    .await?;
    assert!(matches!(
        svc.create_product(input("Rust Book", "BOOK-00001", "rust")).await,
        Err(DomainError::SkuAlreadyExists { .. })
    ));

    let page = svc
        .search(ProductQuery {
            tag: Some("rust".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(page.total_elements, 1);

    let stats = svc.statistics().await?;
    assert_eq!(stats.total_products, 2);
    assert_eq!(stats.low_stock_count, 2);
    Ok(())
}

#[tokio::test]
async fn unique_sku_violation_is_a_duplicate() -> Result<()> {
    let repo = create_test_repo().await;
    repo.insert(product("Rust Book", "BOOK-00001", &[])).await?;

    let err = repo
        .insert(product("Rust Book Copy", "BOOK-00001", &[]))
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::duplicate("sku", "BOOK-00001"));

    let err = repo
        .insert_all(vec![product("Other", "BOOK-00001", &[])])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Duplicate { .. }));

    // Moving a second product onto a taken SKU hits the same index.
    let second = repo.insert(product("Go Book", "BOOK-00002", &[])).await?;
    let mut clash = second.clone();
    clash.sku = Some("BOOK-00001".to_string());
    let err = repo
        .update_if_version_matches(second.id, clash, 0)
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::duplicate("sku", "BOOK-00001"));
    Ok(())
}

#[test]
fn duplicate_from_storage_surfaces_as_sku_conflict() {
    let err: DomainError = StoreError::duplicate("sku", "BOOK-00001").into();
    assert!(matches!(
        err,
        DomainError::SkuAlreadyExists { ref sku } if sku == "BOOK-00001"
    ));
}
