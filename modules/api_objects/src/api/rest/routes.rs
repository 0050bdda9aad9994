use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::Service;

pub const BASE: &str = "/api/objects";

pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let objects = Router::new()
        .route(
            "/",
            get(handlers::list_objects).post(handlers::create_object),
        )
        .route("/search", get(handlers::search_objects))
        .route(
            "/{id}",
            get(handlers::get_object)
                .put(handlers::update_object)
                .delete(handlers::delete_object),
        );

    Ok(router.merge(
        Router::new()
            .nest(BASE, objects)
            .layer(Extension(service)),
    ))
}
