//! 会话实体定义
//!
//! 会话从创建到被认领的生命周期状态机：`pending` 的会话没有负责客服，
//! 进入全局队列；`assigned` 的会话绑定唯一一名客服。状态只会从
//! `pending` 变为 `assigned`，不存在反向流转。

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};
use crate::value_objects::{ChatId, CustomerId, OfficerId, Timestamp};

/// 会话状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    /// 等待客服认领
    Pending,
    /// 已绑定客服
    Assigned,
}

impl ChatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
        }
    }
}

/// 会话实体
///
/// 不变式：`status == Pending` 当且仅当 `assigned_officer_id == None`。
/// 构造函数和 `assign` 是仅有的两个修改入口，都会维持该不变式。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    pub customer_id: CustomerId,
    pub assigned_officer_id: Option<OfficerId>,
    pub status: ChatStatus,
    pub created_at: Timestamp,
}

impl Chat {
    /// 创建未分配的会话（进入全局队列）。
    pub fn new_pending(id: ChatId, customer_id: CustomerId, created_at: Timestamp) -> Self {
        Self {
            id,
            customer_id,
            assigned_officer_id: None,
            status: ChatStatus::Pending,
            created_at,
        }
    }

    /// 创建直接绑定客服的会话（不进入队列）。
    pub fn new_assigned(
        id: ChatId,
        customer_id: CustomerId,
        officer_id: OfficerId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            customer_id,
            assigned_officer_id: Some(officer_id),
            status: ChatStatus::Assigned,
            created_at,
        }
    }

    /// 从存储加载会话行。状态与负责客服字段不一致视为数据损坏。
    pub fn from_parts(
        id: ChatId,
        customer_id: CustomerId,
        assigned_officer_id: Option<OfficerId>,
        status: ChatStatus,
        created_at: Timestamp,
    ) -> DomainResult<Self> {
        let consistent = matches!(
            (status, &assigned_officer_id),
            (ChatStatus::Pending, None) | (ChatStatus::Assigned, Some(_))
        );
        if !consistent {
            return Err(DomainError::invalid_argument(
                "status",
                "status does not match assigned officer",
            ));
        }
        Ok(Self {
            id,
            customer_id,
            assigned_officer_id,
            status,
            created_at,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == ChatStatus::Pending
    }

    /// 认领会话。已分配的会话不能再次认领。
    pub fn assign(&mut self, officer_id: OfficerId) -> DomainResult<()> {
        if !self.is_pending() {
            return Err(DomainError::ChatAlreadyAssigned);
        }
        self.assigned_officer_id = Some(officer_id);
        self.status = ChatStatus::Assigned;
        Ok(())
    }
}
