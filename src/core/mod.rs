//! 核心模块：错误、响应结构和中间件

pub mod error;
pub mod middleware;
pub mod response;
