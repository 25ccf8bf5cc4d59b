//! 核心响应处理模块

use axum::{http::StatusCode, Json};
use serde::Serialize;
use uuid::Uuid;

/// 成功响应的统一外层结构
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub request_id: String,
    pub timestamp: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            request_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// 200 OK
    pub fn ok(data: T) -> Json<Self> {
        Json(Self::success(data))
    }

    /// 201 Created
    pub fn created(data: T) -> (StatusCode, Json<Self>) {
        (StatusCode::CREATED, Json(Self::success(data)))
    }
}
