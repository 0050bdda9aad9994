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
    BulkProductReq, NameSearchQuery, ProductDto, ProductReq, ProductSearchReq, ProductStatsDto,
    ProductV1Dto, ProductV1Req, SkuDto,
};
use crate::api::rest::error::map_domain_error;
use crate::domain::service::{generate_sku, Service};

type Svc = Extension<Arc<Service>>;

fn v2_dto(svc: &Service) -> impl Fn(crate::contract::Product) -> ProductDto + '_ {
    move |p| {
        let status = svc.stock_status(&p);
        ProductDto::new(p, status)
    }
}

// ---------------------------------------------------------------- v1

pub async fn list_products_v1(
    Extension(svc): Svc,
    uri: Uri,
) -> Result<JsonBody<Vec<ProductV1Dto>>, ProblemResponse> {
    info!("Listing all products (v1)");
    match svc.list_products().await {
        Ok(all) => Ok(Json(all.into_iter().map(ProductV1Dto::from).collect())),
        Err(e) => {
            error!("Failed to list products: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn get_product_v1(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<JsonBody<ProductV1Dto>, ProblemResponse> {
    info!("Getting product with id: {}", id);
    match svc.get_product(id).await {
        Ok(p) => Ok(Json(ProductV1Dto::from(p))),
        Err(e) => {
            error!("Failed to get product {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn create_product_v1(
    uri: Uri,
    Extension(svc): Svc,
    Json(req): Json<ProductV1Req>,
) -> Result<impl IntoResponse, ProblemResponse> {
    info!("Creating product (v1): {:?}", req.name);
    match svc.create_product(req.into()).await {
        Ok(p) => Ok(created_json(ProductV1Dto::from(p))),
        Err(e) => {
            error!("Failed to create product: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn update_product_v1(
    uri: Uri,
    Extension(svc): Svc,
    Path(id): Path<i64>,
    Json(req): Json<ProductV1Req>,
) -> Result<JsonBody<ProductV1Dto>, ProblemResponse> {
    info!("Updating product {} (v1)", id);
    match svc.update_product(id, req.into(), None).await {
        Ok(p) => Ok(Json(ProductV1Dto::from(p))),
        Err(e) => {
            error!("Failed to update product {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn delete_product_v1(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<impl IntoResponse, ProblemResponse> {
    info!("Deleting product: {}", id);
    match svc.delete_product(id).await {
        Ok(()) => Ok(no_content()),
        Err(e) => {
            error!("Failed to delete product {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn search_products_v1(
    Extension(svc): Svc,
    Query(q): Query<NameSearchQuery>,
    uri: Uri,
) -> Result<JsonBody<Vec<ProductV1Dto>>, ProblemResponse> {
    info!("Searching products by name: {}", q.name);
    match svc.search_by_name(&q.name).await {
        Ok(found) => Ok(Json(found.into_iter().map(ProductV1Dto::from).collect())),
        Err(e) => {
            error!("Failed to search products: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

// ---------------------------------------------------------------- v2

pub async fn search_products(
    uri: Uri,
    Extension(svc): Svc,
    Json(req): Json<ProductSearchReq>,
) -> Result<JsonPage<ProductDto>, ProblemResponse> {
    match svc.search(req.into()).await {
        Ok(page) => Ok(Json(page.map_items(v2_dto(&svc)))),
        Err(e) => {
            error!("Failed to search products: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn get_product(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<JsonBody<ProductDto>, ProblemResponse> {
    info!("Getting product with id: {}", id);
    match svc.get_product(id).await {
        Ok(p) => Ok(Json(v2_dto(&svc)(p))),
        Err(e) => {
            error!("Failed to get product {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn get_product_by_sku(
    Extension(svc): Svc,
    Path(sku): Path<String>,
    uri: Uri,
) -> Result<JsonBody<ProductDto>, ProblemResponse> {
    info!("Getting product with SKU: {}", sku);
    match svc.get_product_by_sku(&sku).await {
        Ok(p) => Ok(Json(v2_dto(&svc)(p))),
        Err(e) => {
            error!("Failed to get product by SKU {}: {}", sku, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn create_product(
    uri: Uri,
    Extension(svc): Svc,
    Json(req): Json<ProductReq>,
) -> Result<impl IntoResponse, ProblemResponse> {
    info!("Creating product: {:?} ({})", req.name, req.sku);
    match svc.create_product(req.into()).await {
        Ok(p) => Ok(created_json(v2_dto(&svc)(p))),
        Err(e) => {
            error!("Failed to create product: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn update_product(
    uri: Uri,
    Extension(svc): Svc,
    Path(id): Path<i64>,
    Json(req): Json<ProductReq>,
) -> Result<JsonBody<ProductDto>, ProblemResponse> {
    info!("Updating product {} (version {:?})", id, req.version);
    let expected = req.version;
    match svc.update_product(id, req.into(), expected).await {
        Ok(p) => Ok(Json(v2_dto(&svc)(p))),
        Err(e) => {
            error!("Failed to update product {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn deactivate_product(
    Extension(svc): Svc,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<impl IntoResponse, ProblemResponse> {
    info!("Soft deleting product: {}", id);
    match svc.deactivate_product(id).await {
        Ok(()) => Ok(no_content()),
        Err(e) => {
            error!("Failed to delete product {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn bulk_create_products(
    uri: Uri,
    Extension(svc): Svc,
    Json(req): Json<BulkProductReq>,
) -> Result<impl IntoResponse, ProblemResponse> {
    info!("Bulk creating {} products", req.products.len());
    let inputs = req.products.into_iter().map(Into::into).collect();
    match svc.bulk_create(inputs).await {
        Ok(stored) => {
            let dtos: Vec<ProductDto> = stored.into_iter().map(v2_dto(&svc)).collect();
            Ok(created_json(dtos))
        }
        Err(e) => {
            error!("Bulk create rejected: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn list_categories(
    Extension(svc): Svc,
    uri: Uri,
) -> Result<JsonBody<Vec<String>>, ProblemResponse> {
    match svc.categories().await {
        Ok(c) => Ok(Json(c)),
        Err(e) => {
            error!("Failed to list categories: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn product_stats(
    Extension(svc): Svc,
    uri: Uri,
) -> Result<JsonBody<ProductStatsDto>, ProblemResponse> {
    match svc.statistics().await {
        Ok(s) => Ok(Json(s.into())),
        Err(e) => {
            error!("Failed to compute product statistics: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn generate_sku_handler() -> JsonBody<SkuDto> {
    Json(SkuDto {
        sku: generate_sku(),
    })
}
