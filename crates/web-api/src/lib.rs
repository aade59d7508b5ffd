//! Web API 层。
//!
//! 提供 Axum 路由：落地解析（打开事件）与凭据捕获（提交事件），
//! 把请求委托给应用层的互动事件服务。

mod error;
mod routes;
mod state;
mod templates;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
