//! 核心错误处理模块

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::app::product::error::ProductError;

/// 核心错误类型
#[derive(Debug)]
pub enum CoreError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    InternalServerError(String),
}

/// 错误响应结构
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let (status, error_message, user_message) = match self {
            CoreError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            CoreError::InternalServerError(msg) => {
                error!("内部错误: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    msg,
                )
            }
        };

        let error_response = ErrorResponse {
            error: error_message.to_string(),
            message: user_message,
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, axum::Json(error_response)).into_response()
    }
}

impl From<ProductError> for CoreError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => CoreError::NotFound(err.to_string()),
            ProductError::MissingRequiredFields
            | ProductError::InvalidExpirationFormat(_)
            | ProductError::DuplicateCodeValue(_) => CoreError::BadRequest(err.to_string()),
            ProductError::Storage(_) => CoreError::InternalServerError(err.to_string()),
        }
    }
}

impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        CoreError::BadRequest(format!("请求体无效: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for CoreError {
    fn from(rejection: QueryRejection) -> Self {
        CoreError::BadRequest(format!("查询参数无效: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::StoreError;

    fn status_of(err: ProductError) -> StatusCode {
        CoreError::from(err).into_response().status()
    }

    #[test]
    fn test_product_error_status_mapping() {
        assert_eq!(status_of(ProductError::NotFound(1)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ProductError::MissingRequiredFields),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ProductError::InvalidExpirationFormat("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ProductError::DuplicateCodeValue("A".into())),
            StatusCode::BAD_REQUEST
        );
        let storage = ProductError::Storage(StoreError::Encode(
            serde_json::from_str::<u8>("x").unwrap_err(),
        ));
        assert_eq!(status_of(storage), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
