pub mod chat;
pub mod message;
pub mod officer;

pub use chat::{Chat, ChatStatus};
pub use message::{Message, SenderType};
pub use officer::Officer;
