//! 投递程序入口
//!
//! 把指定活动的消息发给全部活跃接收人。用法: `sender <campaign_id>`。
//! 启动后需要操作员在浏览器里完成一次带外登录（扫码）；Ctrl-C 在
//! 接收人之间协作式取消，不打断进行中的发送。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use application::{
    CampaignDelivery, CampaignDeliveryDependencies, DeliverySettings,
};
use config::AppConfig;
use domain::{AuditLog, CampaignRepository, RecipientRepository, TokenCodec};
use infrastructure::{
    create_pg_pool, PgAuditLog, PgCampaignRepository, PgRecipientRepository, WebMessenger,
    WebMessengerConfig,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let campaign_id: i64 = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: sender <campaign_id>"))?
        .parse()?;

    let config = AppConfig::load()?;
    let codec = Arc::new(TokenCodec::new(&config.token.secret_key)?);

    let pool = create_pg_pool(&config.database.url, config.database.max_connections).await?;
    let campaign = PgCampaignRepository::new(pool.clone()).get(campaign_id).await?;
    let recipients = PgRecipientRepository::new(pool.clone()).list_active().await?;
    if recipients.is_empty() {
        tracing::warn!(campaign_id, "没有活跃接收人，无事可做");
        return Ok(());
    }
    tracing::info!(campaign_id, recipients = recipients.len(), "开始投递");

    let audit: Arc<dyn AuditLog> = Arc::new(PgAuditLog::new(pool));

    let session = WebMessenger::open(WebMessengerConfig {
        webdriver_url: config.messenger.webdriver_url.clone(),
        profile_dir: config.messenger.profile_dir.clone(),
        ..WebMessengerConfig::default()
    })
    .await?;

    let settings = DeliverySettings {
        base_url: config.delivery.base_url.clone(),
        country_prefix: config.delivery.country_prefix.clone(),
        max_retries: config.delivery.max_retries,
        pacing: Duration::from_millis(config.delivery.pacing_ms),
        auth_poll_interval: Duration::from_millis(config.delivery.auth_poll_ms),
        compose_poll_interval: Duration::from_millis(config.delivery.compose_poll_ms),
        compose_poll_attempts: config.delivery.compose_poll_attempts,
    };

    // Ctrl-C -> 协作式取消，在接收人之间生效
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("收到取消请求，当前发送完成后停止");
                cancel.store(true, Ordering::Relaxed);
            }
        });
    }

    let delivery = CampaignDelivery::new(CampaignDeliveryDependencies {
        session,
        codec,
        audit,
        settings,
    });
    let report = delivery.run(&campaign, &recipients, &cancel).await?;

    tracing::info!(
        attempted = report.attempted,
        succeeded = report.succeeded,
        failed = report.failed,
        "投递完成"
    );
    Ok(())
}
