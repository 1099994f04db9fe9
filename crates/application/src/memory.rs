//! 内存存储适配器。
//!
//! 实现与 Postgres 仓储相同的契约，用于单元测试、集成测试以及
//! 无数据库的演示运行。认领操作在同一把锁内完成"检查 + 写入"，
//! 与数据库条件更新具有相同的比较交换语义。

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use domain::{Chat, ChatId, CustomerId, Message, Officer, OfficerId, RepositoryError};

use crate::repository::{ChatRepository, MessageRepository, OfficerRepository};

#[derive(Default)]
pub struct MemoryOfficerRepository {
    officers: Mutex<HashMap<String, Officer>>,
}

impl MemoryOfficerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OfficerRepository for MemoryOfficerRepository {
    async fn create(&self, officer: Officer) -> Result<Officer, RepositoryError> {
        let mut officers = self.officers.lock().expect("officer store poisoned");
        let key = officer.id.as_str().to_owned();
        if officers.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        officers.insert(key, officer.clone());
        Ok(officer)
    }

    async fn find_by_id(&self, id: &OfficerId) -> Result<Option<Officer>, RepositoryError> {
        let officers = self.officers.lock().expect("officer store poisoned");
        Ok(officers.get(id.as_str()).cloned())
    }
}

#[derive(Default)]
pub struct MemoryChatRepository {
    chats: Mutex<HashMap<ChatId, Chat>>,
}

impl MemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatRepository for MemoryChatRepository {
    async fn create(&self, chat: Chat) -> Result<Chat, RepositoryError> {
        let mut chats = self.chats.lock().expect("chat store poisoned");
        if chats
            .values()
            .any(|existing| existing.customer_id == chat.customer_id)
        {
            return Err(RepositoryError::Conflict);
        }
        chats.insert(chat.id, chat.clone());
        Ok(chat)
    }

    async fn find_by_id(&self, id: ChatId) -> Result<Option<Chat>, RepositoryError> {
        let chats = self.chats.lock().expect("chat store poisoned");
        Ok(chats.get(&id).cloned())
    }

    async fn find_by_customer(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<Chat>, RepositoryError> {
        let chats = self.chats.lock().expect("chat store poisoned");
        Ok(chats
            .values()
            .find(|chat| &chat.customer_id == customer_id)
            .cloned())
    }

    async fn list_unassigned(&self) -> Result<Vec<Chat>, RepositoryError> {
        let chats = self.chats.lock().expect("chat store poisoned");
        Ok(chats
            .values()
            .filter(|chat| chat.is_pending())
            .cloned()
            .collect())
    }

    async fn list_by_officer(&self, officer_id: &OfficerId) -> Result<Vec<Chat>, RepositoryError> {
        let chats = self.chats.lock().expect("chat store poisoned");
        Ok(chats
            .values()
            .filter(|chat| chat.assigned_officer_id.as_ref() == Some(officer_id))
            .cloned()
            .collect())
    }

    async fn try_assign(
        &self,
        chat_id: ChatId,
        officer_id: &OfficerId,
    ) -> Result<bool, RepositoryError> {
        // 检查与写入持同一把锁，等价于存储端的条件更新。
        let mut chats = self.chats.lock().expect("chat store poisoned");
        let Some(chat) = chats.get_mut(&chat_id) else {
            return Ok(false);
        };
        if !chat.is_pending() {
            return Ok(false);
        }
        chat.assign(officer_id.clone())
            .map_err(|err| RepositoryError::storage(err.to_string()))?;
        Ok(true)
    }
}

#[derive(Default)]
pub struct MemoryMessageRepository {
    // Vec 保留插入顺序，作为相同时间戳的并列裁决依据。
    messages: Mutex<Vec<Message>>,
}

impl MemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for MemoryMessageRepository {
    async fn create(&self, message: Message) -> Result<Message, RepositoryError> {
        let mut messages = self.messages.lock().expect("message store poisoned");
        messages.push(message.clone());
        Ok(message)
    }

    async fn list_by_chat(&self, chat_id: ChatId) -> Result<Vec<Message>, RepositoryError> {
        let messages = self.messages.lock().expect("message store poisoned");
        let mut result: Vec<Message> = messages
            .iter()
            .filter(|message| message.chat_id == chat_id)
            .cloned()
            .collect();
        // 稳定排序：时间戳相同的消息保持插入顺序。
        result.sort_by_key(|message| message.created_at);
        Ok(result)
    }
}
