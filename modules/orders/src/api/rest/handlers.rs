use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::Uri,
    response::IntoResponse,
    Extension, Json,
};
use svckit::api::{
    problem::ProblemResponse,
    response::{created_json, no_content, JsonBody, JsonPage},
};
use tracing::{error, info};

use crate::api::rest::dto::{
    OrderDto, OrderListParams, OrderReq, OrderV1Dto, OrderV1Req, StatusParam,
};
use crate::api::rest::error::map_domain_error;
use crate::domain::service::Service;

type Svc = Extension<Arc<Service>>;

// ---------------------------------------------------------------- v1

pub async fn create_order_v1(
    uri: Uri,
    Extension(svc): Svc,
    Json(req): Json<OrderV1Req>,
) -> Result<impl IntoResponse, ProblemResponse> {
    match svc.create_order(req.into()).await {
        Ok(o) => Ok(created_json(OrderV1Dto::from(o))),
        Err(e) => {
            error!("Failed to create order: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn get_order_v1(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<JsonBody<OrderV1Dto>, ProblemResponse> {
    svc.get_order(id)
        .await
        .map(|o| Json(o.into()))
        .map_err(|e| map_domain_error(&e, uri.path()))
}

pub async fn list_orders_v1(
    Extension(svc): Svc,
    uri: Uri,
) -> Result<JsonBody<Vec<OrderV1Dto>>, ProblemResponse> {
    info!("Listing all orders (v1)");
    svc.list_orders()
        .await
        .map(|all| Json(all.into_iter().map(OrderV1Dto::from).collect()))
        .map_err(|e| map_domain_error(&e, uri.path()))
}

pub async fn update_order_v1(
    uri: Uri,
    Extension(svc): Svc,
    Path(id): Path<i64>,
    Json(req): Json<OrderV1Req>,
) -> Result<JsonBody<OrderV1Dto>, ProblemResponse> {
    match svc.update_order(id, req.into(), None).await {
        Ok(o) => Ok(Json(o.into())),
        Err(e) => {
            error!("Failed to update order {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

// ---------------------------------------------------------------- v2

pub async fn create_order(
    uri: Uri,
    Extension(svc): Svc,
    Json(req): Json<OrderReq>,
) -> Result<impl IntoResponse, ProblemResponse> {
    match svc.create_order(req.into()).await {
        Ok(o) => Ok(created_json(OrderDto::from(o))),
        Err(e) => {
            error!("Failed to create order: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn get_order(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<JsonBody<OrderDto>, ProblemResponse> {
    svc.get_order(id)
        .await
        .map(|o| Json(o.into()))
        .map_err(|e| map_domain_error(&e, uri.path()))
}

pub async fn list_orders(
    Extension(svc): Svc,
    Query(params): Query<OrderListParams>,
    uri: Uri,
) -> Result<JsonPage<OrderDto>, ProblemResponse> {
    match svc.list_page(params.into()).await {
        Ok(page) => Ok(Json(page.map_items(OrderDto::from))),
        Err(e) => {
            error!("Failed to list orders: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn orders_for_user(
    Extension(svc): Svc,
    Path(user_id): Path<i64>,
    uri: Uri,
) -> Result<JsonBody<Vec<OrderDto>>, ProblemResponse> {
    svc.orders_for_user(user_id)
        .await
        .map(|found| Json(found.into_iter().map(OrderDto::from).collect()))
        .map_err(|e| map_domain_error(&e, uri.path()))
}

pub async fn orders_with_status(
    Extension(svc): Svc,
    Path(status): Path<String>,
    uri: Uri,
) -> Result<JsonBody<Vec<OrderDto>>, ProblemResponse> {
    svc.orders_with_status(&status)
        .await
        .map(|found| Json(found.into_iter().map(OrderDto::from).collect()))
        .map_err(|e| map_domain_error(&e, uri.path()))
}

pub async fn update_order(
    uri: Uri,
    Extension(svc): Svc,
    Path(id): Path<i64>,
    Json(req): Json<OrderReq>,
) -> Result<JsonBody<OrderDto>, ProblemResponse> {
    let expected = req.version;
    match svc.update_order(id, req.into(), expected).await {
        Ok(o) => Ok(Json(o.into())),
        Err(e) => {
            error!("Failed to update order {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn update_order_status(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    Query(p): Query<StatusParam>,
    uri: Uri,
) -> Result<JsonBody<OrderDto>, ProblemResponse> {
    match svc.update_status(id, &p.status).await {
        Ok(o) => Ok(Json(o.into())),
        Err(e) => {
            error!("Failed to update status of order {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Hard delete; shared by v1 and v2.
pub async fn delete_order(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<impl IntoResponse, ProblemResponse> {
    match svc.delete_order(id).await {
        Ok(()) => Ok(no_content()),
        Err(e) => {
            error!("Failed to delete order {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
