//! 基础设施：JSON 文件存储和日志

pub mod logger;
pub mod store;
