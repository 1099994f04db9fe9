//! 事件广播抽象。
//!
//! 广播是权威写入成功之后的尽力而为副作用：发布失败不会回滚、
//! 不会重试，也不会上抛给调用方。错过事件的客户端通过 REST 读取
//! 重新拉取权威状态即可恢复。

use async_trait::async_trait;
use domain::ChatId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dto::{ChatDto, MessageDto};

/// 逻辑广播组：全局队列，或某个会话的房间。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Queue,
    Chat(ChatId),
}

/// 实时事件。负载与持久化实体保持一致形状。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SupportEvent {
    /// 新的未分配会话进入全局队列
    ChatQueued { chat: ChatDto },
    /// 会话被客服认领，应从队列视图移除
    ChatClaimed {
        #[serde(rename = "chatId")]
        chat_id: uuid::Uuid,
        #[serde(rename = "officerId")]
        officer_id: String,
    },
    /// 会话房间内有新消息
    MessageAppended { message: MessageDto },
}

/// 发往某个广播组的一次事件投递。
#[derive(Debug, Clone, PartialEq)]
pub struct EventBroadcast {
    pub topic: Topic,
    pub event: SupportEvent,
}

impl EventBroadcast {
    pub fn queue(event: SupportEvent) -> Self {
        Self {
            topic: Topic::Queue,
            event,
        }
    }

    pub fn chat(chat_id: ChatId, event: SupportEvent) -> Self {
        Self {
            topic: Topic::Chat(chat_id),
            event,
        }
    }
}

#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("broadcast failed: {0}")]
    Failed(String),
}

impl BroadcastError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

#[async_trait]
pub trait EventBroadcaster: Send + Sync {
    async fn publish(&self, broadcast: EventBroadcast) -> Result<(), BroadcastError>;
}
