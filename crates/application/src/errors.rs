//! 应用层错误定义

use domain::{DomainError, RepositoryError};
use thiserror::Error;

use crate::messenger::SessionError;

/// 应用层错误类型
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 领域层错误
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// 仓储层错误
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// 消息通道会话错误
    #[error("messenger session error: {0}")]
    Session(#[from] SessionError),

    /// 基础设施层错误
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

/// 应用层结果类型
pub type ApplicationResult<T> = Result<T, ApplicationError>;
