//! 服务层测试装置：内存仓储 + 可控时钟 + 本地广播器。

use std::sync::{Arc, Mutex};

use chrono::{Duration, TimeZone, Utc};
use domain::Timestamp;

use crate::{
    clock::Clock,
    local_broadcast::LocalEventBroadcaster,
    memory::{MemoryChatRepository, MemoryMessageRepository, MemoryOfficerRepository},
    services::{
        MessageService, MessageServiceDependencies, OfficerService, OfficerServiceDependencies,
        QueueService, QueueServiceDependencies,
    },
};

/// 测试用时钟，时间只在显式调用时前进或回拨。
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        }
    }

    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += duration;
    }

    pub fn set(&self, timestamp: Timestamp) {
        *self.now.lock().unwrap() = timestamp;
    }

    pub fn current(&self) -> Timestamp {
        *self.now.lock().unwrap()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap()
    }
}

pub struct TestHarness {
    pub broadcaster: Arc<LocalEventBroadcaster>,
    pub clock: Arc<ManualClock>,
    pub officer_service: Arc<OfficerService>,
    pub queue_service: Arc<QueueService>,
    pub message_service: Arc<MessageService>,
}

pub fn harness() -> TestHarness {
    let officer_repository = Arc::new(MemoryOfficerRepository::new());
    let chat_repository = Arc::new(MemoryChatRepository::new());
    let message_repository = Arc::new(MemoryMessageRepository::new());
    let broadcaster = Arc::new(LocalEventBroadcaster::default());
    let clock = Arc::new(ManualClock::new());

    let officer_service = Arc::new(OfficerService::new(OfficerServiceDependencies {
        officer_repository: officer_repository.clone(),
        clock: clock.clone(),
    }));
    let queue_service = Arc::new(QueueService::new(QueueServiceDependencies {
        chat_repository: chat_repository.clone(),
        officer_repository: officer_repository.clone(),
        clock: clock.clone(),
        broadcaster: broadcaster.clone(),
    }));
    let message_service = Arc::new(MessageService::new(MessageServiceDependencies {
        chat_repository,
        message_repository,
        clock: clock.clone(),
        broadcaster: broadcaster.clone(),
    }));

    TestHarness {
        broadcaster,
        clock,
        officer_service,
        queue_service,
        message_service,
    }
}
