use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::domain::service::Service;

pub const V1_BASE: &str = "/api/v1/users";
pub const V2_BASE: &str = "/api/v2/users";

pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let v1 = Router::new()
        .route("/", get(handlers::list_users_v1).post(handlers::create_user_v1))
        .route("/search", get(handlers::search_users_v1))
        .route(
            "/{id}",
            get(handlers::get_user_v1)
                .put(handlers::update_user_v1)
                .delete(handlers::delete_user_v1),
        );

    let v2 = Router::new()
        .route("/", post(handlers::create_user))
        .route("/search", post(handlers::search_users))
        .route("/bulk", post(handlers::bulk_create_users))
        .route("/roles", get(handlers::list_roles))
        .route("/stats", get(handlers::user_stats))
        .route("/generate-username", post(handlers::generate_username))
        .route("/email/{email}", get(handlers::get_user_by_email))
        .route(
            "/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::deactivate_user),
        )
        .route("/{id}/status", put(handlers::update_user_status));

    let module_router = Router::new()
        .nest(V1_BASE, v1)
        .nest(V2_BASE, v2)
        .layer(Extension(service));

    Ok(router.merge(module_router))
}
