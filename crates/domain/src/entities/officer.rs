//! 客服实体定义

use serde::{Deserialize, Serialize};

use crate::value_objects::{OfficerId, Timestamp};

/// 客服实体。注册一次后不可变，也不会被删除。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Officer {
    pub id: OfficerId,
    pub created_at: Timestamp,
}

impl Officer {
    pub fn new(id: OfficerId, created_at: Timestamp) -> Self {
        Self { id, created_at }
    }
}
