use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::domain::service::Service;

pub const V1_BASE: &str = "/api/v1/products";
pub const V2_BASE: &str = "/api/v2/products";

/// Mount the v1 and v2 product endpoints on `router`.
pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let v1 = Router::new()
        .route(
            "/",
            get(handlers::list_products_v1).post(handlers::create_product_v1),
        )
        .route("/search", get(handlers::search_products_v1))
        .route(
            "/{id}",
            get(handlers::get_product_v1)
                .put(handlers::update_product_v1)
                .delete(handlers::delete_product_v1),
        );

    let v2 = Router::new()
        .route("/", post(handlers::create_product))
        .route("/search", post(handlers::search_products))
        .route("/bulk", post(handlers::bulk_create_products))
        .route("/categories", get(handlers::list_categories))
        .route("/stats", get(handlers::product_stats))
        .route("/generate-sku", get(handlers::generate_sku_handler))
        .route("/sku/{sku}", get(handlers::get_product_by_sku))
        .route(
            "/{id}",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::deactivate_product),
        );

    let module_router = Router::new()
        .nest(V1_BASE, v1)
        .nest(V2_BASE, v2)
        .layer(Extension(service));

    Ok(router.merge(module_router))
}
