use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use svckit::{Module, ModuleCtxBuilder, RestfulModule};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use users::Users;

async fn create_test_router() -> Router {
    let ctx = ModuleCtxBuilder::new(CancellationToken::new())
        .build()
        .for_module("users");
    let module = Users::new();
    module.init(&ctx).await.expect("init");
    module
        .register_rest(&ctx, Router::new())
        .expect("Failed to register routes")
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return (status, Value::Null);
    }
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn john() -> Value {
    json!({
        "username": "jdoe",
        "email": "john.doe@example.com",
        "firstName": "John",
        "lastName": "Doe",
        "phone": "+1-555-0100"
    })
}

#[tokio::test]
async fn v2_lifecycle() {
    let router = create_test_router().await;

    let (status, created) = send(&router, "POST", "/api/v2/users", Some(john())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["role"], "USER");
    assert_eq!(created["status"], "ACTIVE");
    assert_eq!(created["firstName"], "John");

    let (status, by_email) =
        send(&router, "GET", "/api/v2/users/email/john.doe@example.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_email["id"], 1);

    let (status, suspended) =
        send(&router, "PUT", "/api/v2/users/1/status?status=SUSPENDED", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(suspended["status"], "SUSPENDED");
    assert_eq!(suspended["version"], 1);

    let (status, problem) = send(&router, "PUT", "/api/v2/users/1/status?status=BANNED", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["errors"][0]["pointer"], "/status");

    let (status, _) = send(&router, "DELETE", "/api/v2/users/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, stats) = send(&router, "GET", "/api/v2/users/stats", None).await;
    assert_eq!(stats["totalUsers"], 1);
    assert_eq!(stats["inactiveUsers"], 1);
    assert_eq!(stats["usersByRole"], json!({}));
}

#[tokio::test]
async fn v2_conflicts_and_validation() {
    let router = create_test_router().await;
    send(&router, "POST", "/api/v2/users", Some(john())).await;

    let (status, problem) = send(&router, "POST", "/api/v2/users", Some(john())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(problem["code"], "USERS_USERNAME_CONFLICT");

    let (status, problem) = send(
        &router,
        "POST",
        "/api/v2/users",
        Some(json!({"username": "x", "email": "invalid-email", "firstName": "X", "lastName": "Y"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["code"], "USERS_VALIDATION");
    assert_eq!(problem["errors"][0]["pointer"], "/email");

    let mut stale = john();
    stale["version"] = json!(5);
    let (status, problem) = send(&router, "PUT", "/api/v2/users/1", Some(stale)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(problem["code"], "USERS_VERSION_CONFLICT");
}

#[tokio::test]
async fn v2_search_bulk_roles_and_username_generation() {
    let router = create_test_router().await;
    let batch = json!({"users": [
        john(),
        {"username": "asmith", "email": "alice@example.com", "firstName": "Alice", "lastName": "Smith", "role": "ADMIN"}
    ]});
    let (status, created) = send(&router, "POST", "/api/v2/users/bulk", Some(batch)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.as_array().unwrap().len(), 2);

    let (status, page) = send(
        &router,
        "POST",
        "/api/v2/users/search",
        Some(json!({"role": "ADMIN"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["totalElements"], 1);
    assert_eq!(page["content"][0]["username"], "asmith");

    let (_, roles) = send(&router, "GET", "/api/v2/users/roles", None).await;
    assert_eq!(roles, json!(["ADMIN", "USER"]));

    let (status, generated) = send(
        &router,
        "POST",
        "/api/v2/users/generate-username?firstName=Jane&lastName=Doe",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(generated["username"], "jdoe1");
}

#[tokio::test]
async fn v1_endpoints() {
    let router = create_test_router().await;
    let (status, created) = send(&router, "POST", "/api/v1/users", Some(john())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created.get("role").is_none());

    let (_, found) = send(&router, "GET", "/api/v1/users/search?username=JD", None).await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    let (status, _) = send(&router, "DELETE", "/api/v1/users/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, problem) = send(&router, "GET", "/api/v1/users/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(problem["code"], "USERS_NOT_FOUND");
}
