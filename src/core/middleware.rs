//! 核心中间件模块

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Local};
use std::{
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{debug, warn};

use super::error::CoreError;
use crate::{config::AuthConfig, infrastructure::logger::AccessLog};

/// 共享密钥认证
#[derive(Clone)]
pub struct TokenAuth {
    header: Arc<str>,
    token: Arc<str>,
}

impl TokenAuth {
    pub fn new(header: impl Into<Arc<str>>, token: impl Into<Arc<str>>) -> Self {
        Self {
            header: header.into(),
            token: token.into(),
        }
    }
}

impl From<&AuthConfig> for TokenAuth {
    fn from(config: &AuthConfig) -> Self {
        Self::new(config.header.as_str(), config.token.as_str())
    }
}

/// 校验请求头中的 token
pub async fn token_auth_middleware(
    State(auth): State<TokenAuth>,
    req: Request,
    next: Next,
) -> Result<Response, CoreError> {
    let provided = req
        .headers()
        .get(auth.header.as_ref())
        .and_then(|h| h.to_str().ok())
        .filter(|t| !t.is_empty());

    match provided {
        None => {
            warn!("请求缺少 {} 请求头: {} {}", auth.header, req.method(), req.uri());
            return Err(CoreError::Unauthorized(format!(
                "缺少 {} 请求头",
                auth.header
            )));
        }
        Some(token) if token != auth.token.as_ref() => {
            warn!("token 校验失败: {} {}", req.method(), req.uri());
            return Err(CoreError::Unauthorized("token 无效".to_string()));
        }
        Some(_) => {}
    }

    Ok(next.run(req).await)
}

/// 请求日志中间件，每个请求向访问日志追加一行
pub async fn access_log_middleware(
    State(access_log): State<AccessLog>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let client = client_address(&req);

    let response = next.run(req).await;
    let latency = start.elapsed();

    debug!(
        "{} {} - {} - {}ms",
        method,
        path,
        response.status(),
        latency.as_millis()
    );
    access_log.append(&format_access_line(
        Local::now(),
        response.status(),
        latency,
        &client,
        &method,
        &path,
    ));

    response
}

/// 优先取 `X-Forwarded-For` 的第一个地址，其次是连接对端地址
pub fn client_address(req: &Request) -> String {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(addr) = forwarded {
        return addr.to_string();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// `时间 | 状态码 | 耗时 | 客户端地址 |方法 路径`
pub fn format_access_line(
    time: DateTime<Local>,
    status: StatusCode,
    latency: Duration,
    client: &str,
    method: &Method,
    path: &str,
) -> String {
    format!(
        "{} | {:3} | {:>13} | {:>15} |{:<7} {}\n",
        time.format("%Y-%m-%d %H:%M:%S"),
        status.as_u16(),
        format!("{:?}", latency),
        client,
        method.as_str(),
        path
    )
}
