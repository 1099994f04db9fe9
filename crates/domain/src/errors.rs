//! 领域模型错误定义

use thiserror::Error;

/// 领域模型错误类型
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// 输入参数非法
    #[error("invalid argument: {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    /// 客服不存在
    #[error("officer not found")]
    OfficerNotFound,

    /// 客服编号已注册
    #[error("officer already exists")]
    OfficerAlreadyExists,

    /// 会话不存在
    #[error("chat not found")]
    ChatNotFound,

    /// 会话已被认领
    #[error("chat already assigned")]
    ChatAlreadyAssigned,

    /// 消息不存在
    #[error("message not found")]
    MessageNotFound,
}

impl DomainError {
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// 存储层错误类型
///
/// `Storage` 对应持久化层不可用，调用方可以安全地整体重试，
/// 因为每个写操作都是单步原子的。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    Conflict,
    #[error("storage unavailable: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type RepositoryResult<T> = Result<T, RepositoryError>;
