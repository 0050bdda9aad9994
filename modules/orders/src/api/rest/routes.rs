use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::domain::service::Service;

pub const V1_BASE: &str = "/api/v1/orders";
pub const V2_BASE: &str = "/api/v2/orders";

pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let v1 = Router::new()
        .route(
            "/",
            get(handlers::list_orders_v1).post(handlers::create_order_v1),
        )
        .route(
            "/{id}",
            get(handlers::get_order_v1)
                .put(handlers::update_order_v1)
                .delete(handlers::delete_order),
        );

    let v2 = Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route("/user/{user_id}", get(handlers::orders_for_user))
        .route("/status/{status}", get(handlers::orders_with_status))
        .route(
            "/{id}",
            get(handlers::get_order)
                .put(handlers::update_order)
                .delete(handlers::delete_order),
        )
        .route("/{id}/status", patch(handlers::update_order_status));

    Ok(router.merge(
        Router::new()
            .nest(V1_BASE, v1)
            .nest(V2_BASE, v2)
            .layer(Extension(service)),
    ))
}
