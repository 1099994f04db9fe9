//! 消息实体定义
//!
//! 消息一旦创建即不可变，按服务端分配的 `created_at` 升序排列，
//! 时间戳相同时按插入顺序决定先后。

use serde::{Deserialize, Serialize};

use crate::value_objects::{ChatId, MessageContent, MessageId, Timestamp};

/// 发送方类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    Customer,
    Officer,
}

impl SenderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Officer => "officer",
        }
    }
}

/// 消息实体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub chat_id: ChatId,
    pub sender_type: SenderType,
    pub sender_id: String,
    pub content: MessageContent,
    pub created_at: Timestamp,
}

impl Message {
    /// 创建新消息。时间戳由服务端时钟分配，不采用客户端时间，
    /// 保证排序不受客户端时钟偏差影响。
    pub fn new(
        id: MessageId,
        chat_id: ChatId,
        sender_type: SenderType,
        sender_id: impl Into<String>,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            chat_id,
            sender_type,
            sender_id: sender_id.into(),
            content,
            created_at,
        }
    }
}
