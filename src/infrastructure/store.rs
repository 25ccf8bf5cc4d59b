//! JSON 文件存储基础设施
//!
//! 整个商品列表保存在一个 JSON 数组文件中。每个操作都完整读取文件、
//! 在内存中修改，再整体写回。

use parking_lot::Mutex;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info};

use crate::app::product::model::{Product, ProductId};

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("数据文件不存在: {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("无法读取数据文件 {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("数据文件 {path} 不是有效的商品列表: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("商品列表序列化失败: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("无法写入数据文件 {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("商品 {0} 不存在")]
    NotFound(ProductId),
    #[error("商品 id 已用尽")]
    IdExhausted,
}

/// 商品持久化接口
pub trait ProductStore: Send + Sync {
    fn get_all(&self) -> Result<Vec<Product>, StoreError>;

    fn get_by_id(&self, id: ProductId) -> Result<Product, StoreError>;

    /// 分配新 id 并追加，返回写入后的商品
    fn create(&self, product: Product) -> Result<Product, StoreError>;

    /// 按 id 整体替换，返回被替换的旧记录
    fn update(&self, product: Product) -> Result<Product, StoreError>;

    /// 按 id 删除，返回被删除的记录
    fn delete(&self, id: ProductId) -> Result<Product, StoreError>;
}

/// 基于单个 JSON 文件的商品存储
pub struct JsonStore {
    path: PathBuf,
    // 串行化同一进程内的读-改-写周期
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// 打开存储，文件不存在时创建一个空列表文件
    pub fn init(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self::new(path);
        if !store.path.exists() {
            if let Some(parent) = store.path.parent() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: store.path.clone(),
                    source,
                })?;
            }
            store.save(&[])?;
            info!("已创建空数据文件: {}", store.path.display());
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<Product>, StoreError> {
        let bytes = fs::read(&self.path).map_err(|source| {
            let path = self.path.clone();
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::Open { path, source }
            } else {
                StoreError::Read { path, source }
            }
        })?;

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    /// 先写临时文件再重命名覆盖，避免写到一半留下损坏的文件
    fn save(&self, products: &[Product]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(products).map_err(StoreError::Encode)?;
        let tmp_path = self.path.with_extension("json.tmp");
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        fs::write(&tmp_path, bytes).map_err(write_err)?;
        fs::rename(&tmp_path, &self.path).map_err(write_err)?;
        debug!("已写入 {} 个商品到 {}", products.len(), self.path.display());
        Ok(())
    }
}

/// 连续 id 时等于 `count + 1`，删除后仍保证不与现有 id 冲突
fn next_id(products: &[Product]) -> Result<ProductId, StoreError> {
    products
        .iter()
        .map(|p| p.id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or(StoreError::IdExhausted)
}

impl ProductStore for JsonStore {
    fn get_all(&self) -> Result<Vec<Product>, StoreError> {
        self.load()
    }

    fn get_by_id(&self, id: ProductId) -> Result<Product, StoreError> {
        self.load()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn create(&self, mut product: Product) -> Result<Product, StoreError> {
        let _guard = self.write_lock.lock();
        let mut products = self.load()?;
        product.id = next_id(&products)?;
        products.push(product.clone());
        self.save(&products)?;
        Ok(product)
    }

    fn update(&self, product: Product) -> Result<Product, StoreError> {
        let _guard = self.write_lock.lock();
        let mut products = self.load()?;
        let slot = products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or(StoreError::NotFound(product.id))?;
        let previous = std::mem::replace(slot, product);
        self.save(&products)?;
        Ok(previous)
    }

    fn delete(&self, id: ProductId) -> Result<Product, StoreError> {
        let _guard = self.write_lock.lock();
        let mut products = self.load()?;
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let removed = products.remove(index);
        self.save(&products)?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn product(code: &str, price: f64) -> Product {
        Product {
            name: format!("product {code}"),
            quantity: 5,
            code_value: code.to_string(),
            is_published: true,
            expiration: "01/01/2030".to_string(),
            price,
            ..Product::default()
        }
    }

    #[test]
    fn test_init_creates_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("products.json");

        let store = JsonStore::init(&path).unwrap();
        assert!(path.exists());
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_init_keeps_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("products.json");
        let existing = vec![Product {
            id: 1,
            ..product("A", 10.0)
        }];
        fs::write(&path, serde_json::to_vec(&existing).unwrap()).unwrap();

        let store = JsonStore::init(&path).unwrap();
        assert_eq!(store.get_all().unwrap(), existing);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("absent.json"));
        assert!(matches!(store.get_all(), Err(StoreError::Open { .. })));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("products.json");
        fs::write(&path, r#"{"not": "a list"}"#).unwrap();

        let store = JsonStore::new(&path);
        assert!(matches!(store.get_all(), Err(StoreError::Decode { .. })));
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let dir = tempdir().unwrap();
        let store = JsonStore::init(dir.path().join("products.json")).unwrap();

        let first = store.create(product("A", 10.0)).unwrap();
        let second = store.create(product("B", 20.0)).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.get_by_id(2).unwrap(), second);
    }

    #[test]
    fn test_create_after_delete_keeps_ids_unique() {
        let dir = tempdir().unwrap();
        let store = JsonStore::init(dir.path().join("products.json")).unwrap();
        for code in ["A", "B", "C"] {
            store.create(product(code, 1.0)).unwrap();
        }

        store.delete(1).unwrap();
        let created = store.create(product("D", 1.0)).unwrap();

        let mut ids: Vec<_> = store.get_all().unwrap().iter().map(|p| p.id).collect();
        ids.sort_unstable();
        assert_eq!(created.id, 4);
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_create_fails_when_ids_exhausted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("products.json");
        let existing = vec![Product {
            id: ProductId::MAX,
            ..product("A", 10.0)
        }];
        fs::write(&path, serde_json::to_vec(&existing).unwrap()).unwrap();
        let before = fs::read(&path).unwrap();

        let store = JsonStore::new(&path);
        assert!(matches!(
            store.create(product("B", 20.0)),
            Err(StoreError::IdExhausted)
        ));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_update_returns_previous_record() {
        let dir = tempdir().unwrap();
        let store = JsonStore::init(dir.path().join("products.json")).unwrap();
        let created = store.create(product("A", 10.0)).unwrap();

        let replacement = Product {
            price: 12.5,
            ..created.clone()
        };
        let previous = store.update(replacement.clone()).unwrap();
        assert_eq!(previous, created);
        assert_eq!(store.get_by_id(created.id).unwrap(), replacement);
    }

    #[test]
    fn test_update_unknown_id() {
        let dir = tempdir().unwrap();
        let store = JsonStore::init(dir.path().join("products.json")).unwrap();
        let result = store.update(Product {
            id: 42,
            ..product("A", 1.0)
        });
        assert!(matches!(result, Err(StoreError::NotFound(42))));
    }

    #[test]
    fn test_delete_unknown_id_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("products.json");
        let store = JsonStore::init(&path).unwrap();
        store.create(product("A", 1.0)).unwrap();
        let before = fs::read(&path).unwrap();

        assert!(matches!(store.delete(9), Err(StoreError::NotFound(9))));
        assert_eq!(fs::read(&path).unwrap(), before);
    }
}
