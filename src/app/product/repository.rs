//! 商品仓储
//!
//! 在存储层之上维护 `code_value -> Product` 的内存索引，用于编码唯一性检查。
//! 读操作直接访问存储层，不经过索引。

use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

use super::{
    error::ProductError,
    model::{Product, ProductId},
};
use crate::infrastructure::store::ProductStore;

pub trait ProductRepository: Send + Sync {
    /// 编码索引的快照
    fn get_by_code(&self) -> HashMap<String, Product>;

    fn get_all(&self) -> Result<Vec<Product>, ProductError>;

    fn get_by_id(&self, id: ProductId) -> Result<Product, ProductError>;

    /// 价格严格大于 `price` 的商品
    fn filter_by_price_greater_than(&self, price: f64) -> Result<Vec<Product>, ProductError>;

    fn create(&self, product: Product) -> Result<Product, ProductError>;

    fn update(&self, id: ProductId, product: Product) -> Result<Product, ProductError>;

    /// 零值字段沿用已存储的值
    fn patch(&self, id: ProductId, partial: Product) -> Result<Product, ProductError>;

    fn delete(&self, id: ProductId) -> Result<(), ProductError>;
}

pub struct FileProductRepository {
    store: Arc<dyn ProductStore>,
    code_index: RwLock<HashMap<String, Product>>,
}

impl FileProductRepository {
    /// 读取全部商品并建立编码索引
    pub fn new(store: Arc<dyn ProductStore>) -> Result<Self, ProductError> {
        let code_index: HashMap<_, _> = store
            .get_all()?
            .into_iter()
            .map(|p| (p.code_value.clone(), p))
            .collect();
        debug!("编码索引已建立，共 {} 个商品", code_index.len());

        Ok(Self {
            store,
            code_index: RwLock::new(code_index),
        })
    }

    fn replace(&self, product: Product) -> Result<Product, ProductError> {
        let previous = self.store.update(product.clone())?;

        let mut index = self.code_index.write();
        if previous.code_value != product.code_value {
            forget_code(&mut index, &previous);
        }
        index.insert(product.code_value.clone(), product.clone());
        Ok(product)
    }
}

/// 仅当索引项仍指向该商品时才移除
fn forget_code(index: &mut HashMap<String, Product>, product: &Product) {
    if index
        .get(&product.code_value)
        .is_some_and(|indexed| indexed.id == product.id)
    {
        index.remove(&product.code_value);
    }
}

impl ProductRepository for FileProductRepository {
    fn get_by_code(&self) -> HashMap<String, Product> {
        self.code_index.read().clone()
    }

    fn get_all(&self) -> Result<Vec<Product>, ProductError> {
        Ok(self.store.get_all()?)
    }

    fn get_by_id(&self, id: ProductId) -> Result<Product, ProductError> {
        Ok(self.store.get_by_id(id)?)
    }

    fn filter_by_price_greater_than(&self, price: f64) -> Result<Vec<Product>, ProductError> {
        let products = self.store.get_all()?;
        Ok(products.into_iter().filter(|p| p.price > price).collect())
    }

    fn create(&self, product: Product) -> Result<Product, ProductError> {
        let created = self.store.create(product)?;
        self.code_index
            .write()
            .insert(created.code_value.clone(), created.clone());
        Ok(created)
    }

    fn update(&self, id: ProductId, mut product: Product) -> Result<Product, ProductError> {
        product.id = id;
        self.replace(product)
    }

    fn patch(&self, id: ProductId, partial: Product) -> Result<Product, ProductError> {
        let existing = self
            .store
            .get_all()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(ProductError::NotFound(id))?;
        self.replace(partial.merge_onto(&existing))
    }

    fn delete(&self, id: ProductId) -> Result<(), ProductError> {
        let removed = self.store.delete(id)?;
        forget_code(&mut self.code_index.write(), &removed);
        Ok(())
    }
}
