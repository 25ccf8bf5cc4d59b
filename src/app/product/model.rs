//! 商品数据模型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 过期日期格式：日/月/年
pub const EXPIRATION_FORMAT: &str = "%d/%m/%Y";

pub type ProductId = u64;

/// 库存商品
///
/// 所有字段在反序列化时都可以省略，省略的字段取零值（空字符串、0、false），
/// 因此“未提供”和“显式设为零值”无法区分。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub quantity: i64,
    pub code_value: String,
    pub is_published: bool,
    pub expiration: String,
    pub price: f64,
}

impl Product {
    /// 按 `DD/MM/YYYY` 解析过期日期，格式不是定宽或日期不存在（如 31/02）时返回 `None`
    pub fn expiration_date(&self) -> Option<NaiveDate> {
        if !is_fixed_width_date(&self.expiration) {
            return None;
        }
        NaiveDate::parse_from_str(&self.expiration, EXPIRATION_FORMAT).ok()
    }

    /// 用 `existing` 的值补齐所有零值字段，id 取自 `existing`
    pub fn merge_onto(mut self, existing: &Product) -> Product {
        self.id = existing.id;
        if self.name.is_empty() {
            self.name = existing.name.clone();
        }
        if self.quantity == 0 {
            self.quantity = existing.quantity;
        }
        if self.code_value.is_empty() {
            self.code_value = existing.code_value.clone();
        }
        if !self.is_published {
            self.is_published = existing.is_published;
        }
        if self.expiration.is_empty() {
            self.expiration = existing.expiration.clone();
        }
        if self.price == 0.0 {
            self.price = existing.price;
        }
        self
    }
}

/// chrono 接受一位数的日/月和任意长度的年份，这里要求严格的 `DD/MM/YYYY`
fn is_fixed_width_date(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'/',
            _ => b.is_ascii_digit(),
        })
}

/// `GET /products/filter` 查询参数
#[derive(Debug, Deserialize)]
pub struct PriceFilter {
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milk() -> Product {
        Product {
            id: 7,
            name: "Milk".to_string(),
            quantity: 10,
            code_value: "MLK01".to_string(),
            is_published: true,
            expiration: "15/12/2023".to_string(),
            price: 2.99,
        }
    }

    #[test]
    fn test_missing_fields_default_to_zero_values() {
        let product: Product = serde_json::from_str(r#"{"name":"Bread"}"#).unwrap();
        assert_eq!(product.name, "Bread");
        assert_eq!(product.id, 0);
        assert_eq!(product.quantity, 0);
        assert!(product.code_value.is_empty());
        assert!(!product.is_published);
        assert_eq!(product.price, 0.0);
    }

    #[test]
    fn test_expiration_date() {
        assert_eq!(
            milk().expiration_date(),
            NaiveDate::from_ymd_opt(2023, 12, 15)
        );

        let mut product = milk();
        product.expiration = "31/02/2023".to_string();
        assert!(product.expiration_date().is_none());

        product.expiration = "2023-12-31".to_string();
        assert!(product.expiration_date().is_none());
    }

    #[test]
    fn test_expiration_requires_fixed_width() {
        for raw in [
            "1/2/2030",
            "01/2/2030",
            "01/02/30",
            "01/02/12030",
            " 01/02/2030",
            "01/ 02/2030",
            "01/02/2030 ",
            "01-02-2030",
            "+1/02/2030",
        ] {
            let product = Product {
                expiration: raw.to_string(),
                ..milk()
            };
            assert!(product.expiration_date().is_none(), "accepted {raw:?}");
        }

        let product = Product {
            expiration: "01/02/2030".to_string(),
            ..milk()
        };
        assert_eq!(
            product.expiration_date(),
            NaiveDate::from_ymd_opt(2030, 2, 1)
        );
    }

    #[test]
    fn test_merge_onto_keeps_supplied_fields() {
        let partial = Product {
            name: "Oat milk".to_string(),
            ..Product::default()
        };
        let merged = partial.merge_onto(&milk());
        assert_eq!(
            merged,
            Product {
                name: "Oat milk".to_string(),
                ..milk()
            }
        );
    }

    #[test]
    fn test_merge_onto_treats_zero_as_absent() {
        let partial = Product {
            id: 99,
            quantity: 0,
            price: 0.0,
            is_published: false,
            ..Product::default()
        };
        let merged = partial.merge_onto(&milk());
        assert_eq!(merged, milk());
    }
}
