//! 服务配置
//!
//! 从 TOML 文件加载，缺省值见各 `Default` 实现，环境变量可覆盖部分字段。

use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};
use tracing::info;

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "SUPERMARKET_CONFIG";

const CONFIG_PATHS: [&str; 2] = ["config.toml", "./config/config.toml"];

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 数据文件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: PathBuf,
    /// 启动时数据文件不存在则创建空列表
    pub create_if_missing: bool,
}

/// 认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// 携带 token 的请求头名称
    pub header: String,
    pub token: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
    pub log_dir: PathBuf,
    /// 访问日志文件名，位于 `log_dir` 下
    pub access_log: String,
    pub console_output: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            timeout_seconds: 30,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/products.json"),
            create_if_missing: true,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            header: "token".to_string(),
            token: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("./logs"),
            access_log: "access.log".to_string(),
            console_output: true,
        }
    }
}

impl AppConfig {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::FileWrite(e.to_string()))?;
        }

        fs::write(path.as_ref(), content).map_err(|e| ConfigError::FileWrite(e.to_string()))
    }

    /// 加载配置：`SUPERMARKET_CONFIG` 指定的文件、默认路径中第一个存在的文件，
    /// 或者默认配置；之后应用环境变量覆盖
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                info!("从配置文件加载: {}", path);
                Self::load_from_file(path)?
            }
            Err(_) => match CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
                Some(path) => {
                    info!("从配置文件加载: {}", path);
                    Self::load_from_file(path)?
                }
                None => {
                    info!("未找到配置文件，使用默认配置");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// `TOKEN` 覆盖认证 token，`PORT` 覆盖监听端口
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("TOKEN") {
            self.auth.token = token;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Validation(format!("无效的端口: {}", port)))?;
        }
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("HTTP端口必须大于0".to_string()));
        }
        if self.server.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }
        if self.storage.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation("数据文件路径不能为空".to_string()));
        }
        if self.auth.header.is_empty() {
            return Err(ConfigError::Validation("认证请求头名称不能为空".to_string()));
        }
        if self.auth.token.is_empty() {
            return Err(ConfigError::Validation(
                "认证 token 不能为空，请设置 auth.token 或环境变量 TOKEN".to_string(),
            ));
        }
        if self.logging.access_log.is_empty() {
            return Err(ConfigError::Validation("访问日志文件名不能为空".to_string()));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, LOG_LEVELS
            )));
        }

        Ok(())
    }

    /// 监听地址
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.server.bind_address.parse().map_err(|_| {
            ConfigError::Validation(format!("无效的绑定地址: {}", self.server.bind_address))
        })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("文件写入错误: {0}")]
    FileWrite(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置序列化错误: {0}")]
    Serialize(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}
