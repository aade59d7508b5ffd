//! 仓储接口定义
//!
//! 核心只消费接收人/活动目录的读取接口，从不修改它们。
//! 互动事件与审计日志是只追加的写入接口。

use async_trait::async_trait;

use crate::entities::{Campaign, EngagementEvent, Recipient};
use crate::errors::RepositoryResult;

/// 互动事件存储，只追加
///
/// 追加之间相互独立、可交换，跨接收人不要求任何顺序保证。
#[async_trait]
pub trait TrackingStore: Send + Sync {
    async fn append(&self, event: EngagementEvent) -> RepositoryResult<()>;
}

/// 审计/错误日志，尽力而为
///
/// 记录失败本身不是致命错误，调用方不应因此中断。
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record_error(&self, component: &str, message: &str);
}

/// 接收人目录读取接口（外部协作方）
#[async_trait]
pub trait RecipientRepository: Send + Sync {
    /// 返回所有活跃接收人
    async fn list_active(&self) -> RepositoryResult<Vec<Recipient>>;
}

/// 活动目录读取接口（外部协作方）
#[async_trait]
pub trait CampaignRepository: Send + Sync {
    async fn get(&self, campaign_id: i64) -> RepositoryResult<Campaign>;
}
