//! 钓鱼演练系统核心领域模型
//!
//! 包含接收人、演练活动、互动事件等核心实体，以及令牌编解码服务。

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod services;

// 重新导出常用类型
pub use entities::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
