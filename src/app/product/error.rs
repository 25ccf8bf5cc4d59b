//! 商品业务错误

use thiserror::Error;

use super::model::ProductId;
use crate::infrastructure::store::StoreError;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("商品缺少必填字段")]
    MissingRequiredFields,
    #[error("过期日期格式无效，应为 DD/MM/YYYY: {0}")]
    InvalidExpirationFormat(String),
    #[error("商品编码已存在: {0}")]
    DuplicateCodeValue(String),
    #[error("商品 {0} 不存在")]
    NotFound(ProductId),
    #[error(transparent)]
    Storage(StoreError),
}

impl From<StoreError> for ProductError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ProductError::NotFound(id),
            other => ProductError::Storage(other),
        }
    }
}
