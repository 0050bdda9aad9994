use std::sync::Arc;

use anyhow::Result;
use rust_decimal::Decimal;

use orders::{
    contract::model::{OrderDetails, OrderInput, OrderListQuery, OrderStatus},
    domain::{
        error::DomainError,
        service::{Service, ServiceConfig},
    },
    infra::storage::memory_repo::InMemoryOrdersRepository,
};

fn service() -> Service {
    Service::new(
        Arc::new(InMemoryOrdersRepository::new()),
        ServiceConfig::default(),
    )
}

fn order(user_id: i64, product_id: i64, quantity: i64, total: &str) -> OrderInput {
    OrderInput {
        user_id: Some(user_id),
        product_id: Some(product_id),
        quantity: Some(quantity),
        total_price: Some(total.parse().unwrap()),
        shipping_address: Some("1 Main St".into()),
        details: Some(OrderDetails {
            notes: Some("leave at door".into()),
        }),
    }
}

#[tokio::test]
async fn new_orders_are_pending() -> Result<()> {
    let svc = service();
    let o = svc.create_order(order(1, 10, 2, "39.98")).await?;
    assert_eq!(o.status, OrderStatus::Pending);
    assert_eq!(o.version, 0);
    assert_eq!(o.notes.as_deref(), Some("leave at door"));
    assert_eq!(svc.get_order(o.id).await?, o);
    Ok(())
}

#[tokio::test]
async fn invalid_order_is_rejected() {
    let svc = service();
    let err = svc
        .create_order(OrderInput {
            quantity: Some(0),
            ..Default::default()
        })
        .await
        .unwrap_err();
    let DomainError::Validation { errors } = err else {
        panic!("expected validation error");
    };
    assert!(errors.get("userId").is_some());
    assert!(errors.get("productId").is_some());
    assert!(errors.get("totalPrice").is_some());
    assert_eq!(errors.get("quantity"), Some("Quantity must be at least 1"));
}

#[tokio::test]
async fn status_transitions_bump_version() -> Result<()> {
    let svc = service();
    let o = svc.create_order(order(1, 10, 1, "5")).await?;
    let shipped = svc.update_status(o.id, "SHIPPED").await?;
    assert_eq!(shipped.status, OrderStatus::Shipped);
    assert_eq!(shipped.version, 1);

    assert!(matches!(
        svc.update_status(o.id, "LOST").await,
        Err(DomainError::Validation { .. })
    ));
    assert!(matches!(
        svc.update_status(404, "SHIPPED").await,
        Err(DomainError::OrderNotFound { id: 404 })
    ));
    Ok(())
}

#[tokio::test]
async fn v1_update_keeps_notes_and_stale_version_conflicts() -> Result<()> {
    let svc = service();
    let o = svc.create_order(order(1, 10, 1, "5")).await?;
    let v1 = OrderInput {
        details: None,
        quantity: Some(3),
        ..order(1, 10, 3, "15")
    };
    let updated = svc.update_order(o.id, v1, None).await?;
    assert_eq!(updated.quantity, 3);
    assert_eq!(updated.notes.as_deref(), Some("leave at door"));

    let stale = svc
        .update_order(o.id, order(1, 10, 4, "20"), Some(0))
        .await
        .unwrap_err();
    assert!(matches!(
        stale,
        DomainError::VersionConflict {
            expected: 0,
            actual: 1,
            ..
        }
    ));
    Ok(())
}

#[tokio::test]
async fn lookups_by_user_and_status() -> Result<()> {
    let svc = service();
    svc.create_order(order(1, 10, 1, "5")).await?;
    svc.create_order(order(2, 10, 1, "5")).await?;
    svc.create_order(order(1, 11, 1, "7")).await?;
    svc.update_status(2, "CANCELLED").await?;

    let mine: Vec<i64> = svc.orders_for_user(1).await?.iter().map(|o| o.id).collect();
    assert_eq!(mine, [1, 3]);

    let cancelled = svc.orders_with_status("CANCELLED").await?;
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].user_id, 2);
    assert!(svc.orders_with_status("DELIVERED").await?.is_empty());
    assert!(svc.orders_with_status("cancelled").await.is_err());
    Ok(())
}

#[tokio::test]
async fn paged_listing() -> Result<()> {
    let svc = service();
    for (q, total) in [(3, "30"), (1, "10"), (2, "20")] {
        svc.create_order(order(1, 10, q, total)).await?;
    }
    let page = svc
        .list_page(OrderListQuery {
            sort_by: Some("totalPrice".into()),
            sort_dir: Some("asc".into()),
            size: Some(2),
            ..Default::default()
        })
        .await?;
    let totals: Vec<Decimal> = page.content.iter().map(|o| o.total_price).collect();
    assert_eq!(totals, [Decimal::from(10), Decimal::from(20)]);
    assert_eq!(page.total_pages, 2);
    assert!(page.has_next);

    let by_id_desc = svc
        .list_page(OrderListQuery {
            sort_by: Some("id".into()),
            ..Default::default()
        })
        .await?;
    let ids: Vec<i64> = by_id_desc.content.iter().map(|o| o.id).collect();
    assert_eq!(ids, [3, 2, 1]);

    assert!(matches!(
        svc.list_page(OrderListQuery {
            sort_by: Some("shippingAddress".into()),
            ..Default::default()
        })
        .await,
        Err(DomainError::Query(_))
    ));
    Ok(())
}

#[tokio::test]
async fn hard_delete() -> Result<()> {
    let svc = service();
    let o = svc.create_order(order(1, 10, 1, "5")).await?;
    svc.delete_order(o.id).await?;
    assert!(svc.list_orders().await?.is_empty());
    assert!(matches!(
        svc.delete_order(o.id).await,
        Err(DomainError::OrderNotFound { .. })
    ));
    Ok(())
}
