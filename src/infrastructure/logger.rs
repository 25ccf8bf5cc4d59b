//! 日志基础设施

use anyhow::Result;
use std::{
    fs,
    io::{self, Write},
    path::Path,
};
use tracing::warn;
use tracing_appender::{
    non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard},
    rolling,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// 应用日志文件名前缀
const APP_LOG_PREFIX: &str = "supermarket";

pub struct Logger;

impl Logger {
    /// 初始化 tracing
    ///
    /// 应用日志按日期分割写入 `log_dir`，`console_output` 为真时同时输出到控制台。
    /// `RUST_LOG` 优先于配置中的日志级别。返回的 guard 必须存活到进程退出。
    pub fn init(config: &LoggingConfig) -> Result<WorkerGuard> {
        fs::create_dir_all(&config.log_dir)?;

        let file_appender = rolling::daily(&config.log_dir, APP_LOG_PREFIX);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.level));

        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_target(false)
                    .with_thread_names(true),
            )
            .with(
                config
                    .console_output
                    .then(|| fmt::layer().with_writer(io::stdout).with_ansi(true)),
            )
            .try_init()?;

        Ok(guard)
    }
}

/// 访问日志：每个请求追加一行到固定文件
#[derive(Clone)]
pub struct AccessLog {
    writer: NonBlocking,
}

impl AccessLog {
    /// 打开 `log_dir/file_name` 追加写入，guard 被释放时刷新剩余内容
    ///
    /// 缓冲区满时写入方阻塞等待，不丢弃访问记录。
    pub fn open(log_dir: impl AsRef<Path>, file_name: &str) -> io::Result<(Self, WorkerGuard)> {
        fs::create_dir_all(log_dir.as_ref())?;
        let appender = rolling::never(log_dir, file_name);
        let (writer, guard) = NonBlockingBuilder::default()
            .lossy(false)
            .finish(appender);
        Ok((Self { writer }, guard))
    }

    pub fn append(&self, line: &str) {
        let mut writer = self.writer.clone();
        if let Err(err) = writer.write_all(line.as_bytes()) {
            warn!("写入访问日志失败: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_access_log_appends_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("access.log");
        fs::write(&path, "earlier line\n").unwrap();

        let (log, guard) = AccessLog::open(dir.path(), "access.log").unwrap();
        log.append("first\n");
        log.clone().append("second\n");
        drop(guard);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "earlier line\nfirst\nsecond\n");
    }

    #[test]
    fn test_access_log_keeps_lines_under_burst() {
        const THREADS: usize = 4;
        const LINES: usize = 50_000;

        let dir = tempdir().unwrap();
        let (log, guard) = AccessLog::open(dir.path(), "access.log").unwrap();

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let log = log.clone();
                std::thread::spawn(move || {
                    for i in 0..LINES {
                        log.append(&format!("{t} {i}\n"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        drop(log);
        drop(guard);

        let content = fs::read_to_string(dir.path().join("access.log")).unwrap();
        assert_eq!(content.lines().count(), THREADS * LINES);
    }
}
