//! 互动事件存储实现
//!
//! 单表 `engagement_events`，只插入。同一 (接收人, 活动) 的重复事件各自成行。

use async_trait::async_trait;
use domain::{EngagementEvent, RepositoryError, RepositoryResult, TrackingStore};
use sqlx::PgPool;

pub struct PgTrackingStore {
    pool: PgPool,
}

impl PgTrackingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackingStore for PgTrackingStore {
    async fn append(&self, event: EngagementEvent) -> RepositoryResult<()> {
        let submission = event.submission.as_ref();
        sqlx::query(
            r#"
            INSERT INTO engagement_events
                (recipient_id, campaign_id, kind, occurred_at,
                 submitted_email, submitted_pass, user_agent, ip_address)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(event.recipient_id)
        .bind(event.campaign_id)
        .bind(event.kind.as_str())
        .bind(event.occurred_at)
        .bind(submission.map(|s| s.submitted_email.as_str()))
        .bind(submission.map(|s| s.submitted_pass.as_str()))
        .bind(submission.map(|s| s.user_agent.as_str()))
        .bind(submission.map(|s| s.ip_address.as_str()))
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::storage(e.to_string()))?;
        Ok(())
    }
}
