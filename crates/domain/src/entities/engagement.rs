//! 互动事件实体
//!
//! 事件日志只追加，不更新也不删除。同一 (接收人, 活动) 可以存在多条事件，
//! 日志的用途是演练后的统计分析，不是会话状态。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 互动事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementKind {
    /// 接收人打开了落地页
    Opened,
    /// 接收人在仿冒页面提交了凭据
    Compromised,
}

impl EngagementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementKind::Opened => "opened",
            EngagementKind::Compromised => "compromised",
        }
    }
}

/// 凭据提交记录，原样保存用于演练复盘
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub submitted_email: String,
    pub submitted_pass: String,
    pub user_agent: String,
    pub ip_address: String,
}

/// 互动事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementEvent {
    pub recipient_id: i64,
    pub campaign_id: i64,
    pub kind: EngagementKind,
    pub occurred_at: DateTime<Utc>,
    /// 仅 Compromised 事件携带
    pub submission: Option<SubmissionRecord>,
}

impl EngagementEvent {
    pub fn opened(recipient_id: i64, campaign_id: i64, occurred_at: DateTime<Utc>) -> Self {
        Self {
            recipient_id,
            campaign_id,
            kind: EngagementKind::Opened,
            occurred_at,
            submission: None,
        }
    }

    pub fn compromised(
        recipient_id: i64,
        campaign_id: i64,
        occurred_at: DateTime<Utc>,
        submission: SubmissionRecord,
    ) -> Self {
        Self {
            recipient_id,
            campaign_id,
            kind: EngagementKind::Compromised,
            occurred_at,
            submission: Some(submission),
        }
    }
}
