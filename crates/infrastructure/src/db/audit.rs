//! 审计/错误日志实现
//!
//! 写入失败只产生一条 warn，不向调用方传播。

use async_trait::async_trait;
use domain::AuditLog;
use sqlx::PgPool;
use tracing::warn;

pub struct PgAuditLog {
    pool: PgPool,
}

impl PgAuditLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLog for PgAuditLog {
    async fn record_error(&self, component: &str, message: &str) {
        let result = sqlx::query(
            "INSERT INTO error_logs (component, error_message) VALUES ($1, $2)",
        )
        .bind(component)
        .bind(message)
        .execute(&self.pool)
        .await;

        if let Err(err) = result {
            warn!(component, error = %err, "audit log write failed");
        }
    }
}
