pub mod message_service;
pub mod officer_service;
pub mod queue_service;

pub use message_service::{
    GetMessagesRequest, MessageService, MessageServiceDependencies, SendMessageRequest,
};
pub use officer_service::{OfficerService, OfficerServiceDependencies, RegisterOfficerRequest};
pub use queue_service::{
    ClaimChatRequest, LoginRequest, QueueService, QueueServiceDependencies,
};

#[cfg(test)]
mod message_service_tests;
#[cfg(test)]
mod officer_service_tests;
#[cfg(test)]
pub(crate) mod test_support;
