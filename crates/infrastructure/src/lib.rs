//! 基础设施层实现。
//!
//! 提供 PostgreSQL 仓储、审计日志、以及基于 WebDriver 的消息通道会话适配器，
//! 实现应用/领域层定义的接口。

pub mod db;
pub mod messenger;

pub use db::{
    create_pg_pool, PgAuditLog, PgCampaignRepository, PgRecipientRepository, PgTrackingStore,
};
pub use messenger::{WebDriverClient, WebMessenger, WebMessengerConfig};
