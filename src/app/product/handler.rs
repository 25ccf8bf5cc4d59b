//! 商品处理器

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use super::{
    model::{PriceFilter, Product, ProductId},
    service::ProductService,
};
use crate::core::{error::CoreError, response::ApiResponse};

#[derive(Clone)]
pub struct AppState {
    pub product_service: Arc<dyn ProductService>,
}

impl AppState {
    pub fn new(product_service: Arc<dyn ProductService>) -> Self {
        Self { product_service }
    }
}

type ProductResponse = Result<Json<ApiResponse<Product>>, CoreError>;

/// 所有方法对无法解析的 id 统一返回 400
fn parse_id(raw: &str) -> Result<ProductId, CoreError> {
    raw.parse()
        .map_err(|_| CoreError::BadRequest(format!("无效的商品 id: {}", raw)))
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Product>>>, CoreError> {
    let products = state.product_service.get_all()?;
    Ok(ApiResponse::ok(products))
}

pub async fn get_product(State(state): State<AppState>, Path(id): Path<String>) -> ProductResponse {
    let product = state.product_service.get_by_id(parse_id(&id)?)?;
    Ok(ApiResponse::ok(product))
}

pub async fn filter_products(
    State(state): State<AppState>,
    query: Result<Query<PriceFilter>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Product>>>, CoreError> {
    let Query(filter) = query?;
    let products = state
        .product_service
        .filter_by_price_greater_than(filter.price)?;
    Ok(ApiResponse::ok(products))
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<Product>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), CoreError> {
    let Json(product) = payload?;
    let created = state.product_service.create(product)?;
    Ok(ApiResponse::created(created))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Product>, JsonRejection>,
) -> ProductResponse {
    let id = parse_id(&id)?;
    let Json(product) = payload?;
    let updated = state.product_service.update(id, product)?;
    Ok(ApiResponse::ok(updated))
}

pub async fn patch_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Product>, JsonRejection>,
) -> ProductResponse {
    let id = parse_id(&id)?;
    let Json(partial) = payload?;
    let patched = state.product_service.patch(id, partial)?;
    Ok(ApiResponse::ok(patched))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, CoreError> {
    state.product_service.delete(parse_id(&id)?)?;
    Ok(StatusCode::NO_CONTENT)
}
