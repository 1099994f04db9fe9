//! 对外数据传输对象。
//!
//! 字段采用与原有 HTTP/事件接口一致的 camelCase 形式。事件负载与
//! 存储实体一一对应，客户端可以按 `id` 在权威读取和实时事件之间去重合并。

use domain::{Chat, ChatStatus, Message, Officer, SenderType, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerDto {
    pub id: String,
    pub created_at: Timestamp,
}

impl From<&Officer> for OfficerDto {
    fn from(officer: &Officer) -> Self {
        Self {
            id: officer.id.as_str().to_owned(),
            created_at: officer.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatDto {
    pub id: Uuid,
    pub customer_id: String,
    pub assigned_officer_id: Option<String>,
    pub status: ChatStatus,
    pub created_at: Timestamp,
}

impl From<&Chat> for ChatDto {
    fn from(chat: &Chat) -> Self {
        Self {
            id: Uuid::from(chat.id),
            customer_id: chat.customer_id.as_str().to_owned(),
            assigned_officer_id: chat
                .assigned_officer_id
                .as_ref()
                .map(|id| id.as_str().to_owned()),
            status: chat.status,
            created_at: chat.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_type: SenderType,
    pub sender_id: String,
    pub content: String,
    pub created_at: Timestamp,
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: Uuid::from(message.id),
            chat_id: Uuid::from(message.chat_id),
            sender_type: message.sender_type,
            sender_id: message.sender_id.clone(),
            content: message.content.as_str().to_owned(),
            created_at: message.created_at,
        }
    }
}
