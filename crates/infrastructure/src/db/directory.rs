//! 接收人/活动目录读取实现
//!
//! 目录由外部管理端维护；这里只读，不写。

use async_trait::async_trait;
use domain::{
    Campaign, CampaignRepository, Recipient, RecipientRepository, RepositoryError,
    RepositoryResult,
};
use sqlx::{PgPool, Row};

pub struct PgRecipientRepository {
    pool: PgPool,
}

impl PgRecipientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipientRepository for PgRecipientRepository {
    async fn list_active(&self) -> RepositoryResult<Vec<Recipient>> {
        let rows = sqlx::query(
            r#"
            SELECT recipient_id, first_name, last_name, email, phone, company_name, is_active
            FROM recipients
            WHERE is_active
            ORDER BY recipient_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::storage(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| Recipient {
                recipient_id: row.get("recipient_id"),
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
                email: row.get("email"),
                phone: row.get("phone"),
                company_name: row.get("company_name"),
                is_active: row.get("is_active"),
            })
            .collect())
    }
}

pub struct PgCampaignRepository {
    pool: PgPool,
}

impl PgCampaignRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CampaignRepository for PgCampaignRepository {
    async fn get(&self, campaign_id: i64) -> RepositoryResult<Campaign> {
        let row = sqlx::query("SELECT campaign_id, message FROM campaigns WHERE campaign_id = $1")
            .bind(campaign_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::storage(e.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        Ok(Campaign {
            campaign_id: row.get("campaign_id"),
            message: row.get("message"),
        })
    }
}
