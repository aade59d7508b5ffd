//! 主应用程序入口
//!
//! 启动落地/教育页 Web 服务。

use std::net::SocketAddr;
use std::sync::Arc;

use application::{EngagementService, EngagementServiceDependencies, SystemClock};
use config::AppConfig;
use domain::TokenCodec;
use infrastructure::{create_pg_pool, PgAuditLog, PgTrackingStore};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 加载配置；密钥缺失或非法在这里直接终止启动
    let config = AppConfig::load()?;
    tracing::info!(config = %config.sanitize(), "配置加载完成");

    let codec = Arc::new(TokenCodec::new(&config.token.secret_key)?);

    // 连接数据库并运行迁移
    let pool = create_pg_pool(&config.database.url, config.database.max_connections).await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;

    let engagement = Arc::new(EngagementService::new(EngagementServiceDependencies {
        store: Arc::new(PgTrackingStore::new(pool.clone())),
        audit: Arc::new(PgAuditLog::new(pool)),
        clock: Arc::new(SystemClock),
    }));

    let app = router(AppState::new(codec, engagement));
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;

    tracing::info!(
        "落地服务器启动在 http://{}:{}",
        config.server.host,
        config.server.port
    );
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
