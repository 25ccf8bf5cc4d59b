use anyhow::Context;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::info;

use supermarket::{
    app::product::{repository::FileProductRepository, service::InventoryService},
    core::middleware::TokenAuth,
    create_app,
    infrastructure::{
        logger::{AccessLog, Logger},
        store::JsonStore,
    },
    AppConfig, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = AppConfig::load()?;
    config.validate()?;

    let _log_guard = Logger::init(&config.logging)?;
    let (access_log, _access_guard) =
        AccessLog::open(&config.logging.log_dir, &config.logging.access_log)
            .context("无法打开访问日志")?;

    info!("启动商品库存服务...");

    let store = if config.storage.create_if_missing {
        JsonStore::init(&config.storage.path)?
    } else {
        JsonStore::new(&config.storage.path)
    };
    info!("数据文件: {}", store.path().display());

    let repository = FileProductRepository::new(Arc::new(store))
        .context("初始化商品仓储失败")?;
    let service = InventoryService::new(Arc::new(repository));

    let app = create_app(
        AppState::new(Arc::new(service)),
        TokenAuth::from(&config.auth),
        Some(access_log),
        Duration::from_secs(config.server.timeout_seconds),
    );

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("无法绑定到 {}", addr))?;

    info!("🚀 商品库存服务运行在 http://{}", addr);
    info!("📖 API 端点 (需要 {} 请求头):", config.auth.header);
    info!("   GET    /products               - 获取所有商品");
    info!("   GET    /products/:id           - 获取特定商品");
    info!("   GET    /products/filter?price= - 价格大于指定值的商品");
    info!("   POST   /products               - 创建商品");
    info!("   PUT    /products/:id           - 整体更新商品");
    info!("   PATCH  /products/:id           - 部分更新商品");
    info!("   DELETE /products/:id           - 删除商品");
    info!("   GET    /health                 - 健康检查");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("服务运行失败")?;

    info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("监听退出信号失败: {}", err);
    }
}
