//! 内存适配器（用于测试和无数据库的简单部署）

use std::sync::Arc;

use async_trait::async_trait;
use domain::{AuditLog, EngagementEvent, RepositoryResult, TrackingStore};
use tokio::sync::Mutex;

/// 内存事件存储：只追加的向量
#[derive(Clone, Default)]
pub struct MemoryTrackingStore {
    events: Arc<Mutex<Vec<EngagementEvent>>>,
}

impl MemoryTrackingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Vec<EngagementEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl TrackingStore for MemoryTrackingStore {
    async fn append(&self, event: EngagementEvent) -> RepositoryResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

/// 内存审计日志
#[derive(Clone, Default)]
pub struct MemoryAuditLog {
    entries: Arc<Mutex<Vec<(String, String)>>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<(String, String)> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn record_error(&self, component: &str, message: &str) {
        self.entries
            .lock()
            .await
            .push((component.to_string(), message.to_string()));
    }
}
