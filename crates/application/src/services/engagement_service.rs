//! 互动事件记录服务
//!
//! 把落地页的打开与凭据提交转换成只追加的互动事件。
//! 重复打开各自追加一条事件，不去重。

use std::sync::Arc;

use domain::{AuditLog, EngagementEvent, SubmissionRecord, TrackingStore};
use tracing::warn;

use crate::clock::Clock;
use crate::errors::ApplicationResult;

pub struct EngagementServiceDependencies {
    pub store: Arc<dyn TrackingStore>,
    pub audit: Arc<dyn AuditLog>,
    pub clock: Arc<dyn Clock>,
}

pub struct EngagementService {
    store: Arc<dyn TrackingStore>,
    audit: Arc<dyn AuditLog>,
    clock: Arc<dyn Clock>,
}

impl EngagementService {
    pub fn new(deps: EngagementServiceDependencies) -> Self {
        Self {
            store: deps.store,
            audit: deps.audit,
            clock: deps.clock,
        }
    }

    /// 记录一次落地页打开
    pub async fn record_opened(&self, recipient_id: i64, campaign_id: i64) -> ApplicationResult<()> {
        let event = EngagementEvent::opened(recipient_id, campaign_id, self.clock.now());
        self.append(event).await
    }

    /// 记录一次凭据提交，提交内容原样保存用于复盘
    pub async fn record_compromised(
        &self,
        recipient_id: i64,
        campaign_id: i64,
        submission: SubmissionRecord,
    ) -> ApplicationResult<()> {
        let event =
            EngagementEvent::compromised(recipient_id, campaign_id, self.clock.now(), submission);
        self.append(event).await
    }

    /// 令牌解码失败的内部诊断，尽力而为
    pub async fn report_decode_failure(&self, detail: &str) {
        warn!(detail, "rejected landing token");
        self.audit.record_error("landing", detail).await;
    }

    async fn append(&self, event: EngagementEvent) -> ApplicationResult<()> {
        if let Err(err) = self.store.append(event).await {
            warn!(error = %err, "engagement event append failed");
            self.audit
                .record_error("tracking", &format!("event append failed: {}", err))
                .await;
            return Err(err.into());
        }
        Ok(())
    }
}
