//! 演练投递引擎
//!
//! 通过唯一一个消息通道会话，把活动消息顺序推送给全部活跃接收人。
//! 单个接收人失败从不升级为整轮失败；引擎最终报告 尝试/成功/失败 汇总。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use domain::{AuditLog, Campaign, Recipient, TokenCodec};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::errors::ApplicationResult;
use crate::messenger::MessengerSession;

/// 投递参数
#[derive(Debug, Clone)]
pub struct DeliverySettings {
    /// 落地页基础地址，令牌以 `?data=` 追加其后
    pub base_url: String,
    /// 国际区号前缀，如 "90"
    pub country_prefix: String,
    /// 单个接收人的尝试上限
    pub max_retries: u32,
    /// 接收人之间的固定间隔，规避通道的滥用检测
    pub pacing: Duration,
    /// 登录等待的轮询间隔
    pub auth_poll_interval: Duration,
    /// 输入框轮询间隔
    pub compose_poll_interval: Duration,
    /// 输入框轮询次数上限，耗尽计为一次失败尝试
    pub compose_poll_attempts: u32,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/redirect".to_string(),
            country_prefix: "90".to_string(),
            max_retries: 3,
            pacing: Duration::from_secs(2),
            auth_poll_interval: Duration::from_secs(2),
            compose_poll_interval: Duration::from_secs(1),
            compose_poll_attempts: 10,
        }
    }
}

/// 会话状态机
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    AwaitingManualAuth,
    Ready,
    Sending,
    Done,
}

/// 单个接收人的投递结果（瞬态，不持久化）
#[derive(Debug, Clone)]
pub struct RecipientOutcome {
    pub recipient_id: i64,
    pub phone: String,
    pub sent: bool,
    pub tries: u32,
}

/// 整轮投递的汇总报告
#[derive(Debug, Clone, Default)]
pub struct DeliveryReport {
    pub attempted: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub outcomes: Vec<RecipientOutcome>,
}

pub struct CampaignDeliveryDependencies<S> {
    pub session: S,
    pub codec: Arc<TokenCodec>,
    pub audit: Arc<dyn AuditLog>,
    pub settings: DeliverySettings,
}

/// 投递引擎：独占持有一个消息通道会话
pub struct CampaignDelivery<S: MessengerSession> {
    session: S,
    codec: Arc<TokenCodec>,
    audit: Arc<dyn AuditLog>,
    settings: DeliverySettings,
    state: SessionState,
}

impl<S: MessengerSession> CampaignDelivery<S> {
    pub fn new(deps: CampaignDeliveryDependencies<S>) -> Self {
        Self {
            session: deps.session,
            codec: deps.codec,
            audit: deps.audit,
            settings: deps.settings,
            state: SessionState::Unauthenticated,
        }
    }

    /// 执行一轮投递。
    ///
    /// `cancel` 在接收人之间检查，从不打断进行中的发送。
    /// 无论中途发生什么，会话都会走到 close。
    pub async fn run(
        mut self,
        campaign: &Campaign,
        recipients: &[Recipient],
        cancel: &AtomicBool,
    ) -> ApplicationResult<DeliveryReport> {
        let result = self.run_inner(campaign, recipients, cancel).await;
        if let Err(err) = self.session.close().await {
            warn!(error = %err, "messenger session close failed");
        }
        self.transition(SessionState::Done);
        result
    }

    async fn run_inner(
        &mut self,
        campaign: &Campaign,
        recipients: &[Recipient],
        cancel: &AtomicBool,
    ) -> ApplicationResult<DeliveryReport> {
        self.await_manual_auth(cancel).await?;

        let mut report = DeliveryReport::default();
        if cancel.load(Ordering::Relaxed) {
            return Ok(report);
        }

        self.transition(SessionState::Sending);
        let total = recipients.len();
        for (index, recipient) in recipients.iter().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                info!(delivered = report.attempted, "delivery cancelled between recipients");
                break;
            }

            let phone = normalize_phone(&recipient.phone, &self.settings.country_prefix);
            let token = self.codec.encode(recipient.recipient_id, campaign.campaign_id)?;
            let link = format!("{}?data={}", self.settings.base_url, token);
            let message = format!("{}\n{}", campaign.message, link);

            info!(position = index + 1, total, phone = %phone, "sending campaign message");
            let outcome = self.send_with_retries(recipient, &phone, &message).await;

            report.attempted += 1;
            if outcome.sent {
                report.succeeded += 1;
            } else {
                report.failed += 1;
                self.audit
                    .record_error(
                        "delivery",
                        &format!(
                            "recipient {} unreachable after {} tries",
                            recipient.recipient_id, outcome.tries
                        ),
                    )
                    .await;
            }
            report.outcomes.push(outcome);

            // 最后一个接收人之后不再等待
            if index + 1 < total && !cancel.load(Ordering::Relaxed) {
                sleep(self.settings.pacing).await;
            }
        }

        info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed,
            "campaign delivery finished"
        );
        Ok(report)
    }

    /// 登录等待：轮询带外认证标志，直到操作员完成认证。
    ///
    /// 这一步不设超时：认证由人完成，引擎阻塞到完成或进程终止。
    async fn await_manual_auth(&mut self, cancel: &AtomicBool) -> ApplicationResult<()> {
        self.transition(SessionState::AwaitingManualAuth);
        loop {
            if cancel.load(Ordering::Relaxed) {
                return Ok(());
            }
            if !self.session.login_pending().await? {
                break;
            }
            debug!("waiting for operator to complete messenger login");
            sleep(self.settings.auth_poll_interval).await;
        }
        self.transition(SessionState::Ready);
        Ok(())
    }

    /// 对单个接收人尝试投递，最多 max_retries 次。
    /// 找不到输入框和传输错误都消耗一次尝试；耗尽即标记失败，轮次继续。
    async fn send_with_retries(
        &mut self,
        recipient: &Recipient,
        phone: &str,
        message: &str,
    ) -> RecipientOutcome {
        let mut tries = 0;
        while tries < self.settings.max_retries {
            tries += 1;
            match self.attempt_send(phone, message).await {
                Ok(true) => {
                    debug!(phone = %phone, tries, "message committed");
                    return RecipientOutcome {
                        recipient_id: recipient.recipient_id,
                        phone: phone.to_string(),
                        sent: true,
                        tries,
                    };
                }
                Ok(false) => {
                    warn!(phone = %phone, tries, "compose surface never became ready");
                }
                Err(err) => {
                    warn!(phone = %phone, tries, error = %err, "send attempt failed");
                    sleep(self.settings.compose_poll_interval).await;
                }
            }
        }
        RecipientOutcome {
            recipient_id: recipient.recipient_id,
            phone: phone.to_string(),
            sent: false,
            tries,
        }
    }

    /// 单次尝试：打开新视图 → 有界轮询输入框 → 提交。
    /// 返回 Ok(false) 表示轮询耗尽仍不可交互。
    async fn attempt_send(
        &mut self,
        phone: &str,
        message: &str,
    ) -> Result<bool, crate::messenger::SessionError> {
        self.session.open_conversation(phone, message).await?;
        for _ in 0..self.settings.compose_poll_attempts {
            if self.session.compose_ready().await? {
                self.session.send().await?;
                return Ok(true);
            }
            sleep(self.settings.compose_poll_interval).await;
        }
        Ok(false)
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "session state");
        self.state = next;
    }
}

/// 把联系号码统一为通道要求的国际格式。
/// 已带 `+` 或已带区号前缀的号码原样保留，否则去掉前导零并加上前缀。
pub fn normalize_phone(phone: &str, country_prefix: &str) -> String {
    let trimmed = phone.trim();
    if trimmed.starts_with('+') || trimmed.starts_with(country_prefix) {
        trimmed.to_string()
    } else {
        format!("{}{}", country_prefix, trimmed.trim_start_matches('0'))
    }
}
