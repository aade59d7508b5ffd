//! 接收人实体
//!
//! 接收人目录由外部管理端维护，核心只读取，不修改。

use serde::{Deserialize, Serialize};

/// 演练接收人
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    /// 接收人ID（一经分配不可变）
    pub recipient_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// 联系号码，发送前统一为国际格式
    pub phone: String,
    pub company_name: String,
    /// 只有活跃接收人才参与投递
    pub is_active: bool,
}

impl Recipient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
