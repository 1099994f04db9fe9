//! Postgres 仓储实现。
//!
//! 所有条件判断都落在数据库侧：会话认领通过单条条件 UPDATE 完成，
//! 客户唯一性由 customer_id 的唯一索引裁决，应用层不持有任何锁。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    Chat, ChatId, ChatStatus, CustomerId, Message, MessageContent, MessageId, Officer, OfficerId,
    RepositoryError, SenderType,
};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::DbPool;
use application::repository::{ChatRepository, MessageRepository, OfficerRepository};

fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict;
        }
    }
    RepositoryError::storage(err.to_string())
}

fn invalid_data(message: impl Into<String>) -> RepositoryError {
    RepositoryError::storage(message)
}

#[derive(Debug, FromRow)]
struct OfficerRecord {
    id: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OfficerRecord> for Officer {
    type Error = RepositoryError;

    fn try_from(value: OfficerRecord) -> Result<Self, Self::Error> {
        let id = OfficerId::parse(value.id).map_err(|err| invalid_data(err.to_string()))?;
        Ok(Officer::new(id, value.created_at))
    }
}

#[derive(Debug, FromRow)]
struct ChatRecord {
    id: Uuid,
    customer_id: String,
    assigned_officer_id: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ChatRecord> for Chat {
    type Error = RepositoryError;

    fn try_from(value: ChatRecord) -> Result<Self, Self::Error> {
        let customer_id =
            CustomerId::parse(value.customer_id).map_err(|err| invalid_data(err.to_string()))?;
        let assigned_officer_id = value
            .assigned_officer_id
            .map(OfficerId::parse)
            .transpose()
            .map_err(|err| invalid_data(err.to_string()))?;
        let status = match value.status.as_str() {
            "pending" => ChatStatus::Pending,
            "assigned" => ChatStatus::Assigned,
            other => return Err(invalid_data(format!("unknown chat status: {other}"))),
        };

        Chat::from_parts(
            ChatId::from(value.id),
            customer_id,
            assigned_officer_id,
            status,
            value.created_at,
        )
        .map_err(|err| invalid_data(err.to_string()))
    }
}

#[derive(Debug, FromRow)]
struct MessageRecord {
    id: Uuid,
    chat_id: Uuid,
    sender_type: String,
    sender_id: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRecord> for Message {
    type Error = RepositoryError;

    fn try_from(value: MessageRecord) -> Result<Self, Self::Error> {
        let sender_type = match value.sender_type.as_str() {
            "customer" => SenderType::Customer,
            "officer" => SenderType::Officer,
            other => return Err(invalid_data(format!("unknown sender type: {other}"))),
        };
        let content =
            MessageContent::new(value.content).map_err(|err| invalid_data(err.to_string()))?;

        Ok(Message::new(
            MessageId::from(value.id),
            ChatId::from(value.chat_id),
            sender_type,
            value.sender_id,
            content,
            value.created_at,
        ))
    }
}

#[derive(Clone)]
pub struct PgOfficerRepository {
    pool: DbPool,
}

impl PgOfficerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfficerRepository for PgOfficerRepository {
    async fn create(&self, officer: Officer) -> Result<Officer, RepositoryError> {
        let record = sqlx::query_as::<_, OfficerRecord>(
            r#"
            INSERT INTO officers (id, created_at)
            VALUES ($1, $2)
            RETURNING id, created_at
            "#,
        )
        .bind(officer.id.as_str())
        .bind(officer.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.try_into()
    }

    async fn find_by_id(&self, id: &OfficerId) -> Result<Option<Officer>, RepositoryError> {
        let record = sqlx::query_as::<_, OfficerRecord>(
            "SELECT id, created_at FROM officers WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(TryInto::try_into).transpose()
    }
}

#[derive(Clone)]
pub struct PgChatRepository {
    pool: DbPool,
}

impl PgChatRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    async fn create(&self, chat: Chat) -> Result<Chat, RepositoryError> {
        let record = sqlx::query_as::<_, ChatRecord>(
            r#"
            INSERT INTO chats (id, customer_id, assigned_officer_id, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, customer_id, assigned_officer_id, status, created_at
            "#,
        )
        .bind(Uuid::from(chat.id))
        .bind(chat.customer_id.as_str())
        .bind(chat.assigned_officer_id.as_ref().map(OfficerId::as_str))
        .bind(chat.status.as_str())
        .bind(chat.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.try_into()
    }

    async fn find_by_id(&self, id: ChatId) -> Result<Option<Chat>, RepositoryError> {
        let record = sqlx::query_as::<_, ChatRecord>(
            r#"
            SELECT id, customer_id, assigned_officer_id, status, created_at
            FROM chats
            WHERE id = $1
            "#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(TryInto::try_into).transpose()
    }

    async fn find_by_customer(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<Chat>, RepositoryError> {
        let record = sqlx::query_as::<_, ChatRecord>(
            r#"
            SELECT id, customer_id, assigned_officer_id, status, created_at
            FROM chats
            WHERE customer_id = $1
            "#,
        )
        .bind(customer_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(TryInto::try_into).transpose()
    }

    async fn list_unassigned(&self) -> Result<Vec<Chat>, RepositoryError> {
        let records = sqlx::query_as::<_, ChatRecord>(
            r#"
            SELECT id, customer_id, assigned_officer_id, status, created_at
            FROM chats
            WHERE assigned_officer_id IS NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        records.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_by_officer(&self, officer_id: &OfficerId) -> Result<Vec<Chat>, RepositoryError> {
        let records = sqlx::query_as::<_, ChatRecord>(
            r#"
            SELECT id, customer_id, assigned_officer_id, status, created_at
            FROM chats
            WHERE assigned_officer_id = $1
            "#,
        )
        .bind(officer_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        records.into_iter().map(TryInto::try_into).collect()
    }

    async fn try_assign(
        &self,
        chat_id: ChatId,
        officer_id: &OfficerId,
    ) -> Result<bool, RepositoryError> {
        // 条件更新是认领竞争的唯一裁决点：谓词在写入时刻重新求值，
        // 输家的 UPDATE 改动零行。
        let result = sqlx::query(
            r#"
            UPDATE chats
            SET assigned_officer_id = $2, status = 'assigned'
            WHERE id = $1 AND assigned_officer_id IS NULL
            "#,
        )
        .bind(Uuid::from(chat_id))
        .bind(officer_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct PgMessageRepository {
    pool: DbPool,
}

impl PgMessageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn create(&self, message: Message) -> Result<Message, RepositoryError> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r#"
            INSERT INTO messages (id, chat_id, sender_type, sender_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, chat_id, sender_type, sender_id, content, created_at
            "#,
        )
        .bind(Uuid::from(message.id))
        .bind(Uuid::from(message.chat_id))
        .bind(message.sender_type.as_str())
        .bind(&message.sender_id)
        .bind(message.content.as_str())
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.try_into()
    }

    async fn list_by_chat(&self, chat_id: ChatId) -> Result<Vec<Message>, RepositoryError> {
        // seq 由 BIGSERIAL 递增分配，作为相同时间戳的并列裁决依据。
        let records = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT id, chat_id, sender_type, sender_id, content, created_at
            FROM messages
            WHERE chat_id = $1
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(Uuid::from(chat_id))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        records.into_iter().map(TryInto::try_into).collect()
    }
}
