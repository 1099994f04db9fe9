//! 消息通道。
//!
//! 追加式的会话消息日志：写入由服务端分配 id 和时间戳，读取按
//! `created_at` 升序返回（时间戳相同按插入顺序），供客户端把
//! 历史读取与实时事件按 id 合并。

use std::sync::Arc;

use domain::{Message, SenderType};
use uuid::Uuid;

use crate::{
    broadcaster::{EventBroadcast, EventBroadcaster, SupportEvent},
    clock::Clock,
    dto::MessageDto,
    error::ApplicationError,
    repository::{ChatRepository, MessageRepository},
};

#[derive(Debug, Clone)]
pub struct SendMessageRequest {
    pub chat_id: Uuid,
    pub sender_type: SenderType,
    pub sender_id: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct GetMessagesRequest {
    pub chat_id: Uuid,
}

pub struct MessageServiceDependencies {
    pub chat_repository: Arc<dyn ChatRepository>,
    pub message_repository: Arc<dyn MessageRepository>,
    pub clock: Arc<dyn Clock>,
    pub broadcaster: Arc<dyn EventBroadcaster>,
}

pub struct MessageService {
    deps: MessageServiceDependencies,
}

impl MessageService {
    pub fn new(deps: MessageServiceDependencies) -> Self {
        Self { deps }
    }

    /// 追加一条消息。会话不存在时失败；写入成功后向会话房间
    /// 广播新消息事件，广播失败不影响本次调用。
    pub async fn send_message(
        &self,
        request: SendMessageRequest,
    ) -> Result<Message, ApplicationError> {
        let chat_id = domain::ChatId::from(request.chat_id);

        self.deps
            .chat_repository
            .find_by_id(chat_id)
            .await?
            .ok_or(domain::DomainError::ChatNotFound)?;

        let sender_id = request.sender_id.trim().to_owned();
        if sender_id.is_empty() {
            return Err(domain::DomainError::invalid_argument("senderId", "cannot be empty").into());
        }
        let content = domain::MessageContent::new(request.content)?;

        let message = Message::new(
            domain::MessageId::generate(),
            chat_id,
            request.sender_type,
            sender_id,
            content,
            self.deps.clock.now(),
        );
        let stored = self.deps.message_repository.create(message).await?;

        if let Err(err) = self
            .deps
            .broadcaster
            .publish(EventBroadcast::chat(
                chat_id,
                SupportEvent::MessageAppended {
                    message: MessageDto::from(&stored),
                },
            ))
            .await
        {
            tracing::warn!(
                chat_id = %chat_id,
                message_id = %stored.id,
                error = %err,
                "消息已持久化，但房间广播失败"
            );
        }

        Ok(stored)
    }

    /// 会话内全部消息，`created_at` 升序，时间戳相同按插入顺序。
    pub async fn get_messages(
        &self,
        request: GetMessagesRequest,
    ) -> Result<Vec<Message>, ApplicationError> {
        let chat_id = domain::ChatId::from(request.chat_id);

        self.deps
            .chat_repository
            .find_by_id(chat_id)
            .await?
            .ok_or(domain::DomainError::ChatNotFound)?;

        Ok(self.deps.message_repository.list_by_chat(chat_id).await?)
    }
}
