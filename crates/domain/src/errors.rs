//! 领域模型错误定义
//!
//! 定义了系统中所有可能的错误类型，提供清晰的错误上下文。

use thiserror::Error;

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 密钥材料错误（启动时致命）
    #[error("invalid key material: {message}")]
    InvalidKeyMaterial { message: String },

    /// 令牌加密错误
    #[error("token sealing failed: {message}")]
    TokenSealing { message: String },

    /// 验证错误
    #[error("validation failed: {field}: {message}")]
    ValidationError { field: String, message: String },
}

impl DomainError {
    pub fn invalid_key_material(message: impl Into<String>) -> Self {
        Self::InvalidKeyMaterial {
            message: message.into(),
        }
    }

    pub fn token_sealing(message: impl Into<String>) -> Self {
        Self::TokenSealing {
            message: message.into(),
        }
    }

    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 领域模型结果类型
pub type DomainResult<T> = Result<T, DomainError>;

/// 令牌解码错误
///
/// 三种失败对调用方一视同仁：对外返回一个笼统的拒绝，细节只进内部日志。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenDecodeError {
    /// 不是合法的编码/密文
    #[error("token is not valid ciphertext or encoding")]
    Malformed,

    /// 完整性校验失败（被篡改或密钥不符）
    #[error("token failed authentication")]
    AuthenticationFailed,

    /// 解密成功但载荷不是两个整数
    #[error("token payload is not a recipient/campaign pair")]
    PayloadInvalid,
}

/// 仓储层错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    /// 资源不存在
    #[error("requested record not found")]
    NotFound,

    /// 底层存储错误
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
