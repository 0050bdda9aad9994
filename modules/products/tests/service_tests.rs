use std::sync::Arc;

use anyhow::Result;
use rust_decimal::Decimal;

use products::{
    contract::model::{CatalogFields, ProductInput, ProductQuery, StockStatus},
    domain::{
        error::DomainError,
        service::{Service, ServiceConfig},
    },
    infra::storage::memory_repo::InMemoryProductsRepository,
};

fn service() -> Service {
    Service::new(
        Arc::new(InMemoryProductsRepository::new()),
        ServiceConfig::default(),
    )
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn input(name: &str, price: &str, stock: i64, sku: &str, category: &str, tags: &[&str]) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        description: None,
        price: Some(dec(price)),
        stock: Some(stock),
        catalog: Some(CatalogFields {
            sku: sku.to_string(),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }),
    }
}

fn v1_input(name: &str, price: &str, stock: i64) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        description: Some("plain".to_string()),
        price: Some(dec(price)),
        stock: Some(stock),
        catalog: None,
    }
}

async fn seed_catalog(svc: &Service) -> Result<()> {
    svc.create_product(input("Laptop Pro", "1299.99", 15, "LAP-00001", "Electronics", &["computer", "work"]))
        .await?;
    svc.create_product(input("Gaming Mouse", "49.99", 0, "MOU-00001", "Electronics", &["gaming"]))
        .await?;
    svc.create_product(input("Desk Lamp", "25.00", 5, "LMP-00001", "Home", &["office"]))
        .await?;
    svc.create_product(input("Console Game", "59.99", 30, "GAM-00001", "Games", &["game"]))
        .await?;
    Ok(())
}

#[tokio::test]
async fn create_assigns_id_version_and_active() -> Result<()> {
    let svc = service();
    let p = svc
        .create_product(input("Laptop Pro", "1299.99", 15, "LAP-00001", "Electronics", &["work"]))
        .await?;
    assert_eq!(p.id, 1);
    assert_eq!(p.version, 0);
    assert!(p.active);
    assert_eq!(p.sku.as_deref(), Some("LAP-00001"));
    assert_eq!(p.created_at, p.updated_at);

    let fetched = svc.get_product(p.id).await?;
    assert_eq!(fetched, p);
    let by_sku = svc.get_product_by_sku("LAP-00001").await?;
    assert_eq!(by_sku.id, p.id);
    Ok(())
}

#[tokio::test]
async fn missing_product_is_not_found() {
    let svc = service();
    assert!(matches!(
        svc.get_product(42).await,
        Err(DomainError::ProductNotFound { id: 42 })
    ));
    assert!(matches!(
        svc.get_product_by_sku("NOPE-1").await,
        Err(DomainError::SkuNotFound { .. })
    ));
    assert!(matches!(
        svc.delete_product(42).await,
        Err(DomainError::ProductNotFound { .. })
    ));
}

#[tokio::test]
async fn create_rejects_invalid_fields() {
    let svc = service();
    let mut bad = input("TV", "0", -1, "bad sku", "", &[]);
    bad.description = Some("x".repeat(1001));
    let err = svc.create_product(bad).await.unwrap_err();
    let DomainError::Validation { errors } = err else {
        panic!("expected validation error, got {err:?}");
    };
    for field in ["name", "price", "stock", "sku", "category", "description"] {
        assert!(errors.get(field).is_some(), "missing error for {field}");
    }
    assert!(svc.list_products().await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_sku_is_a_conflict() -> Result<()> {
    let svc = service();
    svc.create_product(input("Laptop Pro", "10", 1, "LAP-00001", "Electronics", &[]))
        .await?;
    let err = svc
        .create_product(input("Laptop Air", "10", 1, "LAP-00001", "Electronics", &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::SkuAlreadyExists { .. }));
    assert_eq!(svc.list_products().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn update_bumps_version_and_checks_expected() -> Result<()> {
    let svc = service();
    let p = svc
        .create_product(input("Laptop Pro", "1000", 3, "LAP-00001", "Electronics", &[]))
        .await?;

    let updated = svc
        .update_product(p.id, input("Laptop Pro 2", "1100", 4, "LAP-00001", "Electronics", &[]), Some(0))
        .await?;
    assert_eq!(updated.version, 1);
    assert_eq!(updated.name, "Laptop Pro 2");
    assert_eq!(updated.created_at, p.created_at);
    assert!(updated.updated_at >= p.updated_at);

    // Stale version from a second writer.
    let err = svc
        .update_product(p.id, input("Laptop Pro 3", "1200", 4, "LAP-00001", "Electronics", &[]), Some(0))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::VersionConflict {
            expected: 0,
            actual: 1,
            ..
        }
    ));
    assert_eq!(svc.get_product(p.id).await?.name, "Laptop Pro 2");
    Ok(())
}

#[tokio::test]
async fn update_to_taken_sku_is_a_conflict() -> Result<()> {
    let svc = service();
    svc.create_product(input("Laptop Pro", "10", 1, "LAP-00001", "Electronics", &[]))
        .await?;
    let second = svc
        .create_product(input("Laptop Air", "10", 1, "LAP-00002", "Electronics", &[]))
        .await?;
    let err = svc
        .update_product(second.id, input("Laptop Air", "10", 1, "LAP-00001", "Electronics", &[]), None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::SkuAlreadyExists { .. }));
    Ok(())
}

#[tokio::test]
async fn v1_update_keeps_catalog_fields() -> Result<()> {
    let svc = service();
    let p = svc
        .create_product(input("Laptop Pro", "10", 1, "LAP-00001", "Electronics", &["work"]))
        .await?;
    let updated = svc
        .update_product(p.id, v1_input("Laptop Renamed", "12.50", 2), None)
        .await?;
    assert_eq!(updated.sku.as_deref(), Some("LAP-00001"));
    assert_eq!(updated.category.as_deref(), Some("Electronics"));
    assert!(updated.tags.contains("work"));
    assert_eq!(updated.price, dec("12.50"));
    Ok(())
}

#[tokio::test]
async fn deactivate_hides_from_default_search() -> Result<()> {
    let svc = service();
    seed_catalog(&svc).await?;
    svc.deactivate_product(3).await?;

    let lamp = svc.get_product(3).await?;
    assert!(!lamp.active);
    assert_eq!(lamp.version, 1);

    let page = svc.search(ProductQuery::default()).await?;
    assert_eq!(page.total_elements, 3);
    assert!(page.content.iter().all(|p| p.id != 3));

    let all = svc
        .search(ProductQuery {
            active_only: Some(false),
            ..Default::default()
        })
        .await?;
    assert_eq!(all.total_elements, 4);

    // v1 listing still sees every row.
    assert_eq!(svc.list_products().await?.len(), 4);
    Ok(())
}

#[tokio::test]
async fn search_combines_filters() -> Result<()> {
    let svc = service();
    seed_catalog(&svc).await?;

    let page = svc
        .search(ProductQuery {
            category: Some("Electronics".to_string()),
            max_price: Some(dec("100")),
            ..Default::default()
        })
        .await?;
    let names: Vec<&str> = page.content.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Gaming Mouse"]);

    let in_stock = svc
        .search(ProductQuery {
            category: Some("Electronics".to_string()),
            in_stock: Some(true),
            ..Default::default()
        })
        .await?;
    assert_eq!(in_stock.content.len(), 1);
    assert_eq!(in_stock.content[0].name, "Laptop Pro");

    let by_name = svc
        .search(ProductQuery {
            name: Some("LAMP".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(by_name.content.len(), 1);
    Ok(())
}

#[tokio::test]
async fn tag_filter_matches_whole_tokens() -> Result<()> {
    let svc = service();
    seed_catalog(&svc).await?;
    let page = svc
        .search(ProductQuery {
            tag: Some("game".to_string()),
            ..Default::default()
        })
        .await?;
    let names: Vec<&str> = page.content.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Console Game"]);
    Ok(())
}

#[tokio::test]
async fn search_sorts_and_pages() -> Result<()> {
    let svc = service();
    seed_catalog(&svc).await?;

    let first = svc
        .search(ProductQuery {
            sort_by: Some("price".to_string()),
            sort_direction: Some("desc".to_string()),
            size: Some(3),
            ..Default::default()
        })
        .await?;
    let prices: Vec<Decimal> = first.content.iter().map(|p| p.price).collect();
    assert_eq!(prices, [dec("1299.99"), dec("59.99"), dec("49.99")]);
    assert_eq!(first.total_elements, 4);
    assert_eq!(first.total_pages, 2);
    assert!(first.first && first.has_next && !first.last);

    let second = svc
        .search(ProductQuery {
            sort_by: Some("price".to_string()),
            sort_direction: Some("desc".to_string()),
            page: Some(1),
            size: Some(3),
            ..Default::default()
        })
        .await?;
    assert_eq!(second.content.len(), 1);
    assert!(second.last && second.has_previous);

    let beyond = svc
        .search(ProductQuery {
            page: Some(7),
            size: Some(3),
            ..Default::default()
        })
        .await?;
    assert!(beyond.content.is_empty());
    assert_eq!(beyond.total_elements, 4);
    Ok(())
}

#[tokio::test]
async fn search_defaults_to_name_order() -> Result<()> {
    let svc = service();
    seed_catalog(&svc).await?;
    let page = svc.search(ProductQuery::default()).await?;
    let names: Vec<&str> = page.content.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Console Game", "Desk Lamp", "Gaming Mouse", "Laptop Pro"]);
    assert_eq!(page.size, 10);
    Ok(())
}

#[tokio::test]
async fn search_rejects_bad_sort_and_paging() -> Result<()> {
    let svc = service();
    seed_catalog(&svc).await?;
    let sort = svc
        .search(ProductQuery {
            sort_by: Some("password".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(sort, DomainError::Query(_)));

    let paging = svc
        .search(ProductQuery {
            size: Some(0),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(paging, DomainError::Query(_)));

    let clamped = svc
        .search(ProductQuery {
            size: Some(5000),
            ..Default::default()
        })
        .await?;
    assert_eq!(clamped.size, 100);
    Ok(())
}

#[tokio::test]
async fn bulk_create_is_all_or_nothing() -> Result<()> {
    let svc = service();
    let batch = vec![
        input("Keyboard", "80", 10, "KEY-00001", "Electronics", &[]),
        input("X", "-1", 10, "KEY-00002", "Electronics", &[]),
    ];
    let err = svc.bulk_create(batch).await.unwrap_err();
    let DomainError::Validation { errors } = err else {
        panic!("expected validation error");
    };
    assert!(errors.get("products[1].name").is_some());
    assert!(errors.get("products[1].price").is_some());
    assert!(svc.list_products().await?.is_empty());

    let dup = vec![
        input("Keyboard", "80", 10, "KEY-00001", "Electronics", &[]),
        input("Keyboard 2", "80", 10, "KEY-00001", "Electronics", &[]),
    ];
    assert!(matches!(
        svc.bulk_create(dup).await,
        Err(DomainError::SkuAlreadyExists { .. })
    ));
    assert!(svc.list_products().await?.is_empty());

    let ok = svc
        .bulk_create(vec![
            input("Keyboard", "80", 10, "KEY-00001", "Electronics", &[]),
            input("Monitor", "200", 2, "MON-00001", "Electronics", &[]),
        ])
        .await?;
    assert_eq!(ok.iter().map(|p| p.id).collect::<Vec<_>>(), [1, 2]);

    assert!(matches!(
        svc.bulk_create(Vec::new()).await,
        Err(DomainError::Validation { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn statistics_cover_active_products() -> Result<()> {
    let svc = service();
    let empty = svc.statistics().await?;
    assert_eq!(empty.total_products, 0);
    assert_eq!(empty.average_price, Decimal::ZERO);

    seed_catalog(&svc).await?;
    svc.deactivate_product(1).await?;
    let stats = svc.statistics().await?;
    assert_eq!(stats.total_products, 4);
    assert_eq!(stats.active_products, 3);
    assert_eq!(stats.inactive_products, 1);
    assert_eq!(stats.total_categories, 3);
    assert_eq!(stats.products_by_category.get("Electronics"), Some(&1));
    assert_eq!(stats.max_price, dec("59.99"));
    assert_eq!(stats.min_price, dec("25.00"));
    assert_eq!(stats.total_stock, 35);
    assert_eq!(stats.out_of_stock_count, 1);
    assert_eq!(stats.low_stock_count, 1);

    assert_eq!(svc.categories().await?, ["Electronics", "Games", "Home"]);
    Ok(())
}

#[tokio::test]
async fn stock_status_uses_threshold() -> Result<()> {
    let svc = service();
    seed_catalog(&svc).await?;
    let expected = [
        (1, StockStatus::InStock),
        (2, StockStatus::OutOfStock),
        (3, StockStatus::LowStock),
    ];
    for (id, status) in expected {
        let p = svc.get_product(id).await?;
        assert_eq!(svc.stock_status(&p), status, "product {id}");
    }
    Ok(())
}

#[tokio::test]
async fn concurrent_updates_with_same_version_let_one_win() -> Result<()> {
    let svc = Arc::new(service());
    let p = svc
        .create_product(input("Laptop Pro", "1000", 3, "LAP-00001", "Electronics", &[]))
        .await?;

    let mut handles = Vec::new();
    for i in 0..8 {
        let svc = svc.clone();
        handles.push(tokio::spawn(async move {
            svc.update_product(
                p.id,
                input(&format!("Laptop v{i}"), "1000", 3, "LAP-00001", "Electronics", &[]),
                Some(0),
            )
            .await
        }));
    }
    let mut wins = 0;
    for h in handles {
        match h.await? {
            Ok(_) => wins += 1,
            Err(DomainError::VersionConflict { .. }) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(wins, 1);
    assert_eq!(svc.get_product(p.id).await?.version, 1);
    Ok(())
}
