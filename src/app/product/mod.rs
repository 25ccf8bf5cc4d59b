//! 商品模块：模型、仓储、业务服务和 HTTP 处理器

pub mod error;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

use axum::{routing::get, Router};

use handler::{
    create_product, delete_product, filter_products, get_product, list_products, patch_product,
    update_product, AppState,
};

/// `/products` 路由，不含认证层
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/filter", get(filter_products))
        .route(
            "/products/:id",
            get(get_product)
                .put(update_product)
                .patch(patch_product)
                .delete(delete_product),
        )
}
