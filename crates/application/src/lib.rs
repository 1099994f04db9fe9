//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务：会话排队与认领的状态机、
//! 消息通道，以及对外部适配器（存储、事件广播、时钟）的抽象。

pub mod broadcaster;
pub mod clock;
pub mod dto;
pub mod error;
pub mod local_broadcast;
pub mod memory;
pub mod repository;
pub mod services;

pub use broadcaster::{BroadcastError, EventBroadcast, EventBroadcaster, SupportEvent, Topic};
pub use clock::{Clock, SystemClock};
pub use dto::{ChatDto, MessageDto, OfficerDto};
pub use error::ApplicationError;
pub use local_broadcast::LocalEventBroadcaster;
pub use memory::{MemoryChatRepository, MemoryMessageRepository, MemoryOfficerRepository};
pub use repository::{ChatRepository, MessageRepository, OfficerRepository};
pub use services::{
    MessageService, MessageServiceDependencies, OfficerService, OfficerServiceDependencies,
    QueueService, QueueServiceDependencies,
};
