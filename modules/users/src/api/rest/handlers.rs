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
    BulkUserReq, StatusQuery, UserDto, UserReq, UserSearchReq, UserStatsDto, UserV1Dto,
    UserV1Req, UsernameDto, UsernameSearchQuery, UsernameSeedQuery,
};
use crate::api::rest::error::map_domain_error;
use crate::domain::service::Service;

type Svc = Extension<Arc<Service>>;

// ---------------------------------------------------------------- v1

pub async fn list_users_v1(
    Extension(svc): Svc,
    uri: Uri,
) -> Result<JsonBody<Vec<UserV1Dto>>, ProblemResponse> {
    info!("Listing all users (v1)");
    match svc.list_users().await {
        Ok(all) => Ok(Json(all.into_iter().map(UserV1Dto::from).collect())),
        Err(e) => {
            error!("Failed to list users: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn get_user_v1(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<JsonBody<UserV1Dto>, ProblemResponse> {
    match svc.get_user(id).await {
        Ok(u) => Ok(Json(u.into())),
        Err(e) => {
            error!("Failed to get user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn create_user_v1(
    uri: Uri,
    Extension(svc): Svc,
    Json(req): Json<UserV1Req>,
) -> Result<impl IntoResponse, ProblemResponse> {
    info!("Creating user (v1): {}", req.username);
    match svc.create_user(req.into()).await {
        Ok(u) => Ok(created_json(UserV1Dto::from(u))),
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn update_user_v1(
    uri: Uri,
    Extension(svc): Svc,
    Path(id): Path<i64>,
    Json(req): Json<UserV1Req>,
) -> Result<JsonBody<UserV1Dto>, ProblemResponse> {
    match svc.update_user(id, req.into(), None).await {
        Ok(u) => Ok(Json(u.into())),
        Err(e) => {
            error!("Failed to update user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn delete_user_v1(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<impl IntoResponse, ProblemResponse> {
    match svc.delete_user(id).await {
        Ok(()) => Ok(no_content()),
        Err(e) => {
            error!("Failed to delete user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn search_users_v1(
    Extension(svc): Svc,
    Query(q): Query<UsernameSearchQuery>,
    uri: Uri,
) -> Result<JsonBody<Vec<UserV1Dto>>, ProblemResponse> {
    match svc.search_by_username(&q.username).await {
        Ok(found) => Ok(Json(found.into_iter().map(UserV1Dto::from).collect())),
        Err(e) => {
            error!("Failed to search users: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

// ---------------------------------------------------------------- v2

pub async fn search_users(
    uri: Uri,
    Extension(svc): Svc,
    Json(req): Json<UserSearchReq>,
) -> Result<JsonPage<UserDto>, ProblemResponse> {
    match svc.search(req.into()).await {
        Ok(page) => Ok(Json(page.map_items(UserDto::from))),
        Err(e) => {
            error!("Failed to search users: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn get_user(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<JsonBody<UserDto>, ProblemResponse> {
    match svc.get_user(id).await {
        Ok(u) => Ok(Json(u.into())),
        Err(e) => {
            error!("Failed to get user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn get_user_by_email(
    Extension(svc): Svc,
    Path(email): Path<String>,
    uri: Uri,
) -> Result<JsonBody<UserDto>, ProblemResponse> {
    match svc.get_user_by_email(&email).await {
        Ok(u) => Ok(Json(u.into())),
        Err(e) => {
            error!("Failed to get user by email: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn create_user(
    uri: Uri,
    Extension(svc): Svc,
    Json(req): Json<UserReq>,
) -> Result<impl IntoResponse, ProblemResponse> {
    info!("Creating user: {}", req.username);
    match svc.create_user(req.into()).await {
        Ok(u) => Ok(created_json(UserDto::from(u))),
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn update_user(
    uri: Uri,
    Extension(svc): Svc,
    Path(id): Path<i64>,
    Json(req): Json<UserReq>,
) -> Result<JsonBody<UserDto>, ProblemResponse> {
    let expected = req.version;
    match svc.update_user(id, req.into(), expected).await {
        Ok(u) => Ok(Json(u.into())),
        Err(e) => {
            error!("Failed to update user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn update_user_status(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    Query(q): Query<StatusQuery>,
    uri: Uri,
) -> Result<JsonBody<UserDto>, ProblemResponse> {
    info!("Setting status of user {} to {}", id, q.status);
    match svc.update_status(id, &q.status).await {
        Ok(u) => Ok(Json(u.into())),
        Err(e) => {
            error!("Failed to update status of user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn deactivate_user(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<impl IntoResponse, ProblemResponse> {
    match svc.deactivate_user(id).await {
        Ok(()) => Ok(no_content()),
        Err(e) => {
            error!("Failed to delete user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn bulk_create_users(
    uri: Uri,
    Extension(svc): Svc,
    Json(req): Json<BulkUserReq>,
) -> Result<impl IntoResponse, ProblemResponse> {
    info!("Bulk creating {} users", req.users.len());
    let inputs = req.users.into_iter().map(Into::into).collect();
    match svc.bulk_create(inputs).await {
        Ok(stored) => Ok(created_json(
            stored.into_iter().map(UserDto::from).collect::<Vec<_>>(),
        )),
        Err(e) => {
            error!("Bulk create rejected: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn list_roles(
    Extension(svc): Svc,
    uri: Uri,
) -> Result<JsonBody<Vec<String>>, ProblemResponse> {
    svc.roles()
        .await
        .map(Json)
        .map_err(|e| map_domain_error(&e, uri.path()))
}

pub async fn user_stats(
    Extension(svc): Svc,
    uri: Uri,
) -> Result<JsonBody<UserStatsDto>, ProblemResponse> {
    match svc.statistics().await {
        Ok(s) => Ok(Json(s.into())),
        Err(e) => {
            error!("Failed to compute user statistics: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn generate_username(
    Extension(svc): Svc,
    Query(q): Query<UsernameSeedQuery>,
    uri: Uri,
) -> Result<JsonBody<UsernameDto>, ProblemResponse> {
    svc.generate_username(&q.first_name, &q.last_name)
        .await
        .map(|username| Json(UsernameDto { username }))
        .map_err(|e| map_domain_error(&e, uri.path()))
}
