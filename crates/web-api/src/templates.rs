//! 嵌入的落地/教育页面模板
//!
//! 不引入模板引擎，占位符直接替换。捕获页把还原出的标识
//! 放进隐藏字段，提交时无需再解一次令牌。

const LOGIN_TEMPLATE: &str = include_str!("../templates/login.html");
const AWARENESS_TEMPLATE: &str = include_str!("../templates/awareness.html");

/// 仿真凭据捕获页
pub fn login_page(recipient_id: i64, campaign_id: i64) -> String {
    LOGIN_TEMPLATE
        .replace("{{user_id}}", &recipient_id.to_string())
        .replace("{{campaign_id}}", &campaign_id.to_string())
}

/// 安全意识教育页
pub fn awareness_page() -> String {
    AWARENESS_TEMPLATE.to_string()
}
