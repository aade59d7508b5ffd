//! 演练活动实体

use serde::{Deserialize, Serialize};

/// 钓鱼演练活动
///
/// 活动创建后不可变；消息模板是投递引擎的只读输入。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub campaign_id: i64,
    /// 发送给接收人的消息模板，个性化链接会追加在其后
    pub message: String,
}
