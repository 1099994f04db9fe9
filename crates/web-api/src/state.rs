use std::sync::Arc;

use application::{LocalEventBroadcaster, MessageService, OfficerService, QueueService};

#[derive(Clone)]
pub struct AppState {
    pub officer_service: Arc<OfficerService>,
    pub queue_service: Arc<QueueService>,
    pub message_service: Arc<MessageService>,
    pub broadcaster: Arc<LocalEventBroadcaster>,
}

impl AppState {
    pub fn new(
        officer_service: Arc<OfficerService>,
        queue_service: Arc<QueueService>,
        message_service: Arc<MessageService>,
        broadcaster: Arc<LocalEventBroadcaster>,
    ) -> Self {
        Self {
            officer_service,
            queue_service,
            message_service,
            broadcaster,
        }
    }
}
