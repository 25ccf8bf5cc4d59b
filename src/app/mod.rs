//! HTTP 应用装配

pub mod product;

use axum::{extract::State, middleware, response::Json, routing::get, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    core::middleware::{access_log_middleware, token_auth_middleware, TokenAuth},
    infrastructure::logger::AccessLog,
};
use product::handler::AppState;

/// 组装完整路由
///
/// `/products` 下的路由需要认证，`/health` 不需要。`access_log` 为 `None` 时不写访问日志。
pub fn create_app(
    state: AppState,
    auth: TokenAuth,
    access_log: Option<AccessLog>,
    timeout: Duration,
) -> Router {
    let products =
        product::routes().route_layer(middleware::from_fn_with_state(auth, token_auth_middleware));

    let app = Router::new()
        .route("/health", get(health_check))
        .merge(products)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(TimeoutLayer::new(timeout)),
        );

    match access_log {
        Some(log) => app.layer(middleware::from_fn_with_state(log, access_log_middleware)),
        None => app,
    }
}

/// 健康检查
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let storage = match state.product_service.get_all() {
        Ok(products) => serde_json::json!({ "status": "ok", "products": products.len() }),
        Err(err) => serde_json::json!({ "status": "unavailable", "error": err.to_string() }),
    };

    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "storage": storage,
    }))
}
