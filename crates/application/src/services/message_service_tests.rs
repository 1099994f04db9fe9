//! 消息通道单元测试
//!
//! 覆盖消息写入、排序规则（时间戳升序、同戳按插入顺序）和房间事件。

use chrono::Duration;
use domain::{DomainError, SenderType};
use uuid::Uuid;

use crate::broadcaster::{SupportEvent, Topic};
use crate::error::ApplicationError;
use crate::services::test_support::harness;
use crate::services::{GetMessagesRequest, LoginRequest, SendMessageRequest};

fn send(chat_id: Uuid, sender_type: SenderType, sender_id: &str, content: &str) -> SendMessageRequest {
    SendMessageRequest {
        chat_id,
        sender_type,
        sender_id: sender_id.to_owned(),
        content: content.to_owned(),
    }
}

async fn open_chat(h: &crate::services::test_support::TestHarness) -> Uuid {
    let chat = h
        .queue_service
        .login(LoginRequest {
            customer_id: "c1".into(),
            officer_id: None,
        })
        .await
        .unwrap();
    Uuid::from(chat.id)
}

#[tokio::test]
async fn send_message_stores_server_assigned_fields() {
    let h = harness();
    let chat_id = open_chat(&h).await;

    let message = h
        .message_service
        .send_message(send(chat_id, SenderType::Customer, "c1", "hello"))
        .await
        .unwrap();

    assert_eq!(Uuid::from(message.chat_id), chat_id);
    assert_eq!(message.sender_type, SenderType::Customer);
    assert_eq!(message.created_at, h.clock.current());
}

#[tokio::test]
async fn send_to_unknown_chat_fails_with_not_found() {
    let h = harness();
    let err = h
        .message_service
        .send_message(send(Uuid::new_v4(), SenderType::Customer, "c1", "hello"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::ChatNotFound)
    ));
}

#[tokio::test]
async fn get_messages_for_unknown_chat_fails_with_not_found() {
    let h = harness();
    let err = h
        .message_service
        .get_messages(GetMessagesRequest {
            chat_id: Uuid::new_v4(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::ChatNotFound)
    ));
}

#[tokio::test]
async fn blank_content_is_rejected() {
    let h = harness();
    let chat_id = open_chat(&h).await;
    let err = h
        .message_service
        .send_message(send(chat_id, SenderType::Customer, "c1", "  "))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::InvalidArgument { .. })
    ));
}

#[tokio::test]
async fn blank_sender_is_rejected() {
    let h = harness();
    let chat_id = open_chat(&h).await;
    let err = h
        .message_service
        .send_message(send(chat_id, SenderType::Officer, " ", "hi"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::InvalidArgument { .. })
    ));
}

#[tokio::test]
async fn messages_are_sorted_by_created_at_not_insertion() {
    let h = harness();
    let chat_id = open_chat(&h).await;

    // 先写入时间戳靠后的消息，再回拨时钟写入更早的消息。
    h.clock.advance(Duration::seconds(10));
    h.message_service
        .send_message(send(chat_id, SenderType::Officer, "o1", "later"))
        .await
        .unwrap();
    h.clock.advance(Duration::seconds(-5));
    h.message_service
        .send_message(send(chat_id, SenderType::Customer, "c1", "earlier"))
        .await
        .unwrap();

    let messages = h
        .message_service
        .get_messages(GetMessagesRequest { chat_id })
        .await
        .unwrap();
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["earlier", "later"]);
}

#[tokio::test]
async fn equal_timestamps_keep_insertion_order() {
    let h = harness();
    let chat_id = open_chat(&h).await;

    // 时钟不动：两条消息拿到完全相同的时间戳。
    h.message_service
        .send_message(send(chat_id, SenderType::Customer, "c1", "first"))
        .await
        .unwrap();
    h.message_service
        .send_message(send(chat_id, SenderType::Officer, "o1", "second"))
        .await
        .unwrap();

    let messages = h
        .message_service
        .get_messages(GetMessagesRequest { chat_id })
        .await
        .unwrap();
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second"]);
}

#[tokio::test]
async fn send_publishes_message_appended_to_chat_room() {
    let h = harness();
    let chat_id = open_chat(&h).await;

    let mut events = h.broadcaster.subscribe();
    let stored = h
        .message_service
        .send_message(send(chat_id, SenderType::Customer, "c1", "hello"))
        .await
        .unwrap();

    let received = events.recv().await.unwrap();
    assert_eq!(received.topic, Topic::Chat(domain::ChatId::from(chat_id)));
    match received.event {
        SupportEvent::MessageAppended { message } => {
            // 事件负载与持久化实体同形，客户端按 id 去重。
            assert_eq!(message.id, Uuid::from(stored.id));
            assert_eq!(message.chat_id, chat_id);
            assert_eq!(message.content, "hello");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn send_succeeds_when_nobody_listens() {
    let h = harness();
    let chat_id = open_chat(&h).await;
    // 没有订阅者，广播失败被吞掉，调用仍成功。
    let message = h
        .message_service
        .send_message(send(chat_id, SenderType::Customer, "c1", "hello"))
        .await
        .unwrap();
    assert_eq!(message.content.as_str(), "hello");
}
