//! 消息通道会话抽象
//!
//! 一次演练投递由唯一一个已认证的有状态会话驱动。会话是共享的
//! 有状态资源，接口全部取 `&mut self`，不支持并发使用。
//! 生命周期: open → authenticate → use → close。

use async_trait::async_trait;
use thiserror::Error;

/// 会话层错误
///
/// 对投递引擎来说两类都按单次尝试可重试处理。
#[derive(Debug, Error)]
pub enum SessionError {
    /// 传输层失败（连接、超时等）
    #[error("transport error: {0}")]
    Transport(String),

    /// 通道返回了非预期的响应
    #[error("messenger protocol error: {0}")]
    Protocol(String),
}

/// 一个已打开的消息通道会话
#[async_trait]
pub trait MessengerSession: Send {
    /// 会话界面上是否仍显示带外登录标志（如待扫描的登录码）
    async fn login_pending(&mut self) -> Result<bool, SessionError>;

    /// 为目标号码打开一个新的会话视图，消息已预填
    async fn open_conversation(&mut self, phone: &str, message: &str) -> Result<(), SessionError>;

    /// 输入框是否已可交互
    async fn compose_ready(&mut self) -> Result<bool, SessionError>;

    /// 提交预填的消息
    async fn send(&mut self) -> Result<(), SessionError>;

    /// 关闭会话；任何路径结束时都会走到这里
    async fn close(&mut self) -> Result<(), SessionError>;
}
