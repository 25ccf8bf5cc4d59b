//! 商品业务服务
//!
//! 写入前做必填字段、日期格式和编码唯一性校验，再交给仓储层。

use std::sync::Arc;
use tracing::{info, warn};

use super::{
    error::ProductError,
    model::{Product, ProductId},
    repository::ProductRepository,
};

pub trait ProductService: Send + Sync {
    fn get_all(&self) -> Result<Vec<Product>, ProductError>;

    fn get_by_id(&self, id: ProductId) -> Result<Product, ProductError>;

    fn filter_by_price_greater_than(&self, price: f64) -> Result<Vec<Product>, ProductError>;

    fn create(&self, product: Product) -> Result<Product, ProductError>;

    /// 整体替换
    fn update(&self, id: ProductId, product: Product) -> Result<Product, ProductError>;

    /// 部分更新，只校验非空字段
    fn patch(&self, id: ProductId, partial: Product) -> Result<Product, ProductError>;

    fn delete(&self, id: ProductId) -> Result<(), ProductError>;
}

/// 名称、编码、过期日期不能为空，数量和价格不能为零
pub fn validate(product: &Product) -> bool {
    !(product.name.is_empty()
        || product.quantity == 0
        || product.code_value.is_empty()
        || product.expiration.is_empty()
        || product.price == 0.0)
}

fn check_expiration(product: &Product) -> Result<(), ProductError> {
    match product.expiration_date() {
        Some(_) => Ok(()),
        None => Err(ProductError::InvalidExpirationFormat(
            product.expiration.clone(),
        )),
    }
}

#[derive(Clone)]
pub struct InventoryService {
    repository: Arc<dyn ProductRepository>,
}

impl InventoryService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    /// 编码已被 `owner` 以外的商品占用时报错
    fn check_code_free(&self, code: &str, owner: Option<ProductId>) -> Result<(), ProductError> {
        let taken = self
            .repository
            .get_by_code()
            .get(code)
            .is_some_and(|existing| Some(existing.id) != owner);
        if taken {
            warn!("商品编码冲突: {}", code);
            return Err(ProductError::DuplicateCodeValue(code.to_string()));
        }
        Ok(())
    }
}

impl ProductService for InventoryService {
    fn get_all(&self) -> Result<Vec<Product>, ProductError> {
        self.repository.get_all()
    }

    fn get_by_id(&self, id: ProductId) -> Result<Product, ProductError> {
        self.repository.get_by_id(id)
    }

    fn filter_by_price_greater_than(&self, price: f64) -> Result<Vec<Product>, ProductError> {
        self.repository.filter_by_price_greater_than(price)
    }

    fn create(&self, product: Product) -> Result<Product, ProductError> {
        if !validate(&product) {
            return Err(ProductError::MissingRequiredFields);
        }
        check_expiration(&product)?;
        self.check_code_free(&product.code_value, None)?;

        let created = self.repository.create(product)?;
        info!("商品已创建: id={}, code={}", created.id, created.code_value);
        Ok(created)
    }

    fn update(&self, id: ProductId, product: Product) -> Result<Product, ProductError> {
        if !validate(&product) {
            return Err(ProductError::MissingRequiredFields);
        }
        self.check_code_free(&product.code_value, Some(id))?;
        check_expiration(&product)?;

        let updated = self.repository.update(id, product)?;
        info!("商品已更新: id={}", id);
        Ok(updated)
    }

    fn patch(&self, id: ProductId, partial: Product) -> Result<Product, ProductError> {
        if !partial.code_value.is_empty() {
            self.check_code_free(&partial.code_value, Some(id))?;
        }
        if !partial.expiration.is_empty() {
            check_expiration(&partial)?;
        }

        let patched = self.repository.patch(id, partial)?;
        info!("商品已部分更新: id={}", id);
        Ok(patched)
    }

    fn delete(&self, id: ProductId) -> Result<(), ProductError> {
        self.repository.delete(id)?;
        info!("商品已删除: id={}", id);
        Ok(())
    }
}
