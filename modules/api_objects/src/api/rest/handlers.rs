use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::Uri,
    response::IntoResponse,
    Extension, Json,
};
use svckit::api::{
    problem::ProblemResponse,
    response::{created_json, no_content, JsonBody},
};
use tracing::{error, info};

use crate::api::rest::dto::{ApiObjectDto, ApiObjectReq, NameQuery};
use crate::api::rest::error::map_domain_error;
use crate::domain::service::Service;

type Svc = Extension<Arc<Service>>;

fn to_dtos(all: Vec<crate::contract::ApiObject>) -> Vec<ApiObjectDto> {
    all.into_iter().map(ApiObjectDto::from).collect()
}

pub async fn list_objects(
    Extension(svc): Svc,
    uri: Uri,
) -> Result<JsonBody<Vec<ApiObjectDto>>, ProblemResponse> {
    info!("Listing all objects");
    svc.list_objects()
        .await
        .map(|all| Json(to_dtos(all)))
        .map_err(|e| map_domain_error(&e, uri.path()))
}

pub async fn get_object(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<JsonBody<ApiObjectDto>, ProblemResponse> {
    match svc.get_object(id).await {
        Ok(o) => Ok(Json(o.into())),
        Err(e) => {
            error!("Failed to get object {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn search_objects(
    Extension(svc): Svc,
    Query(q): Query<NameQuery>,
    uri: Uri,
) -> Result<JsonBody<Vec<ApiObjectDto>>, ProblemResponse> {
    info!("Searching objects by name: {}", q.name);
    svc.search_by_name(&q.name)
        .await
        .map(|found| Json(to_dtos(found)))
        .map_err(|e| map_domain_error(&e, uri.path()))
}

pub async fn create_object(
    uri: Uri,
    Extension(svc): Svc,
    Json(req): Json<ApiObjectReq>,
) -> Result<impl IntoResponse, ProblemResponse> {
    info!("Creating object: {:?}", req.name);
    match svc.create_object(req.into()).await {
        Ok(o) => Ok(created_json(ApiObjectDto::from(o))),
        Err(e) => {
            error!("Failed to create object: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn update_object(
    uri: Uri,
    Extension(svc): Svc,
    Path(id): Path<i64>,
    Json(req): Json<ApiObjectReq>,
) -> Result<JsonBody<ApiObjectDto>, ProblemResponse> {
    match svc.update_object(id, req.into()).await {
        Ok(o) => Ok(Json(o.into())),
        Err(e) => {
            error!("Failed to update object {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn delete_object(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<impl IntoResponse, ProblemResponse> {
    match svc.delete_object(id).await {
        Ok(()) => Ok(no_content()),
        Err(e) => {
            error!("Failed to delete object {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
