mod support;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use support::spawn_server;

async fn login(client: &Client, base: &str, customer_id: &str) -> Value {
    client
        .post(format!("{}/api/customers/login", base))
        .json(&json!({"customerId": customer_id}))
        .send()
        .await
        .expect("login")
        .json::<Value>()
        .await
        .expect("chat json")
}

#[tokio::test]
async fn messages_are_persisted_and_listed_in_order() {
    let server = spawn_server().await;
    let base = server.base_url();
    let client = Client::new();

    let chat = login(&client, &base, "c1").await;
    let chat_id = chat["id"].as_str().unwrap();

    let first = client
        .post(format!("{}/api/chats/{}/messages", base, chat_id))
        .json(&json!({
            "senderType": "customer",
            "senderId": "c1",
            "content": "hello, anyone there?"
        }))
        .send()
        .await
        .expect("send first");
    assert_eq!(first.status(), StatusCode::OK);
    let first = first.json::<Value>().await.expect("message json");
    assert_eq!(first["chatId"], chat_id);
    assert_eq!(first["senderType"], "customer");
    assert!(first["createdAt"].is_string());

    let second = client
        .post(format!("{}/api/chats/{}/messages", base, chat_id))
        .json(&json!({
            "senderType": "officer",
            "senderId": "o1",
            "content": "yes, how can I help?"
        }))
        .send()
        .await
        .expect("send second")
        .json::<Value>()
        .await
        .expect("message json");

    let messages = client
        .get(format!("{}/api/chats/{}/messages", base, chat_id))
        .send()
        .await
        .expect("list")
        .json::<Vec<Value>>()
        .await
        .expect("list json");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["id"], first["id"]);
    assert_eq!(messages[1]["id"], second["id"]);
    assert_eq!(messages[0]["content"], "hello, anyone there?");
}

#[tokio::test]
async fn message_endpoints_reject_unknown_chat() {
    let server = spawn_server().await;
    let base = server.base_url();
    let client = Client::new();
    let ghost = Uuid::new_v4();

    let send = client
        .post(format!("{}/api/chats/{}/messages", base, ghost))
        .json(&json!({
            "senderType": "customer",
            "senderId": "c1",
            "content": "hello"
        }))
        .send()
        .await
        .expect("send");
    assert_eq!(send.status(), StatusCode::NOT_FOUND);

    let list = client
        .get(format!("{}/api/chats/{}/messages", base, ghost))
        .send()
        .await
        .expect("list");
    assert_eq!(list.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_content_is_rejected() {
    let server = spawn_server().await;
    let base = server.base_url();
    let client = Client::new();

    let chat = login(&client, &base, "c1").await;
    let chat_id = chat["id"].as_str().unwrap();

    let resp = client
        .post(format!("{}/api/chats/{}/messages", base, chat_id))
        .json(&json!({
            "senderType": "customer",
            "senderId": "c1",
            "content": "   "
        }))
        .send()
        .await
        .expect("send");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
