//! 存储契约。
//!
//! 所有状态决策都通过这些接口落到唯一的持久化存储上，
//! 应用层不持有任何私有副本。

use async_trait::async_trait;
use domain::{Chat, ChatId, CustomerId, Message, Officer, OfficerId, RepositoryError};

#[async_trait]
pub trait OfficerRepository: Send + Sync {
    async fn create(&self, officer: Officer) -> Result<Officer, RepositoryError>;
    async fn find_by_id(&self, id: &OfficerId) -> Result<Option<Officer>, RepositoryError>;
}

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// 创建会话。`customer_id` 唯一，重复创建返回 `Conflict`。
    async fn create(&self, chat: Chat) -> Result<Chat, RepositoryError>;
    async fn find_by_id(&self, id: ChatId) -> Result<Option<Chat>, RepositoryError>;
    async fn find_by_customer(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<Chat>, RepositoryError>;
    async fn list_unassigned(&self) -> Result<Vec<Chat>, RepositoryError>;
    async fn list_by_officer(&self, officer_id: &OfficerId) -> Result<Vec<Chat>, RepositoryError>;

    /// 认领会话的条件写入：仅当该行此刻仍未分配时才绑定客服。
    ///
    /// 返回 `true` 表示本次写入生效；`false` 表示条件不再成立
    /// （会话已被其他客服抢先认领），未改动任何行。
    /// 这是整个引擎的并发正确性来源，不能用读-改-写近似。
    async fn try_assign(
        &self,
        chat_id: ChatId,
        officer_id: &OfficerId,
    ) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: Message) -> Result<Message, RepositoryError>;

    /// 按 `created_at` 升序返回会话内全部消息，时间戳相同时按插入顺序。
    async fn list_by_chat(&self, chat_id: ChatId) -> Result<Vec<Message>, RepositoryError>;
}
