//! 队列与分配引擎。
//!
//! 会话生命周期的状态机：登录建会话（幂等）、直接分配、排队，
//! 以及解决并发认领竞争的条件写入协议。

use std::sync::Arc;

use domain::Chat;
use uuid::Uuid;

use crate::{
    broadcaster::{EventBroadcast, EventBroadcaster, SupportEvent},
    clock::Clock,
    dto::ChatDto,
    error::ApplicationError,
    repository::{ChatRepository, OfficerRepository},
};

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub customer_id: String,
    pub officer_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ClaimChatRequest {
    pub chat_id: Uuid,
    pub officer_id: String,
}

pub struct QueueServiceDependencies {
    pub chat_repository: Arc<dyn ChatRepository>,
    pub officer_repository: Arc<dyn OfficerRepository>,
    pub clock: Arc<dyn Clock>,
    pub broadcaster: Arc<dyn EventBroadcaster>,
}

pub struct QueueService {
    deps: QueueServiceDependencies,
}

impl QueueService {
    pub fn new(deps: QueueServiceDependencies) -> Self {
        Self { deps }
    }

    /// 客户登录。同一客户重复登录返回既有会话，没有任何副作用。
    pub async fn login(&self, request: LoginRequest) -> Result<Chat, ApplicationError> {
        let customer_id = domain::CustomerId::parse(request.customer_id)?;

        if let Some(existing) = self
            .deps
            .chat_repository
            .find_by_customer(&customer_id)
            .await?
        {
            return Ok(existing);
        }

        let now = self.deps.clock.now();

        if let Some(raw_officer) = request.officer_id {
            // 指定客服：直接建成已分配会话，不进入队列，不发队列事件。
            let officer_id = domain::OfficerId::parse(raw_officer)?;
            self.deps
                .officer_repository
                .find_by_id(&officer_id)
                .await?
                .ok_or(domain::DomainError::OfficerNotFound)?;

            let chat = Chat::new_assigned(
                domain::ChatId::generate(),
                customer_id.clone(),
                officer_id,
                now,
            );
            return match self.deps.chat_repository.create(chat).await {
                Ok(created) => Ok(created),
                Err(domain::RepositoryError::Conflict) => {
                    self.reread_existing(&customer_id).await
                }
                Err(err) => Err(err.into()),
            };
        }

        let chat = Chat::new_pending(domain::ChatId::generate(), customer_id.clone(), now);
        match self.deps.chat_repository.create(chat).await {
            Ok(created) => {
                // 会话已持久化，入队事件只是通知，失败不影响本次调用。
                self.publish_best_effort(EventBroadcast::queue(SupportEvent::ChatQueued {
                    chat: ChatDto::from(&created),
                }))
                .await;
                Ok(created)
            }
            Err(domain::RepositoryError::Conflict) => self.reread_existing(&customer_id).await,
            Err(err) => Err(err.into()),
        }
    }

    /// 认领会话。
    ///
    /// 前置检查只用于快速失败的提示，正确性完全由存储端的条件写入
    /// 保证：两名客服同时认领时，条件写入先落地的一方获胜，
    /// 另一方的写入不改动任何行并收到 `Conflict`。
    pub async fn claim_chat(&self, request: ClaimChatRequest) -> Result<Chat, ApplicationError> {
        let chat_id = domain::ChatId::from(request.chat_id);
        let officer_id = domain::OfficerId::parse(request.officer_id)?;

        let chat = self
            .deps
            .chat_repository
            .find_by_id(chat_id)
            .await?
            .ok_or(domain::DomainError::ChatNotFound)?;
        if !chat.is_pending() {
            return Err(domain::DomainError::ChatAlreadyAssigned.into());
        }

        self.deps
            .officer_repository
            .find_by_id(&officer_id)
            .await?
            .ok_or(domain::DomainError::OfficerNotFound)?;

        let won = self
            .deps
            .chat_repository
            .try_assign(chat_id, &officer_id)
            .await?;
        if !won {
            return Err(domain::DomainError::ChatAlreadyAssigned.into());
        }

        // 条件写入已生效，重新读取权威行返回给调用方。
        let updated = self
            .deps
            .chat_repository
            .find_by_id(chat_id)
            .await?
            .ok_or(domain::DomainError::ChatNotFound)?;

        self.publish_best_effort(EventBroadcast::queue(SupportEvent::ChatClaimed {
            chat_id: Uuid::from(chat_id),
            officer_id: officer_id.as_str().to_owned(),
        }))
        .await;
        self.publish_best_effort(EventBroadcast::chat(
            chat_id,
            SupportEvent::ChatClaimed {
                chat_id: Uuid::from(chat_id),
                officer_id: officer_id.as_str().to_owned(),
            },
        ))
        .await;

        Ok(updated)
    }

    /// 全局队列：所有未分配的会话。顺序无语义，展示排序由前端决定。
    pub async fn list_queue(&self) -> Result<Vec<Chat>, ApplicationError> {
        Ok(self.deps.chat_repository.list_unassigned().await?)
    }

    /// 某客服名下的全部会话。
    pub async fn list_assigned(&self, officer_id: String) -> Result<Vec<Chat>, ApplicationError> {
        let officer_id = domain::OfficerId::parse(officer_id)?;
        self.deps
            .officer_repository
            .find_by_id(&officer_id)
            .await?
            .ok_or(domain::DomainError::OfficerNotFound)?;
        Ok(self.deps.chat_repository.list_by_officer(&officer_id).await?)
    }

    /// 并发登录撞上 customer_id 唯一约束：读回赢家的行，保持幂等。
    async fn reread_existing(
        &self,
        customer_id: &domain::CustomerId,
    ) -> Result<Chat, ApplicationError> {
        self.deps
            .chat_repository
            .find_by_customer(customer_id)
            .await?
            .ok_or_else(|| domain::RepositoryError::Conflict.into())
    }

    async fn publish_best_effort(&self, broadcast: EventBroadcast) {
        if let Err(err) = self.deps.broadcaster.publish(broadcast).await {
            tracing::warn!(error = %err, "事件广播失败，权威状态已落库");
        }
    }
}
