//! # 商品库存服务
//!
//! 以单个 JSON 文件为数据源的商品 CRUD HTTP 服务：
//! - `infrastructure::store`：整文件读-改-写的 JSON 存储
//! - `app::product`：编码索引仓储、业务校验服务和 HTTP 处理器
//! - `core`：错误映射、响应结构、认证和访问日志中间件
//! - `config`：TOML 配置与环境变量覆盖

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::{create_app, product::handler::AppState};
pub use config::{AppConfig, ConfigError};
