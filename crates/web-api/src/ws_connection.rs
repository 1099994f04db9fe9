//! WebSocket 连接处理：连接级的房间成员关系与事件转发。
//!
//! 成员关系只存活在本连接的订阅集合里：客户端显式发送加入指令，
//! 断线即全部失效，重连后必须重新订阅。漏掉的事件不做补发，
//! 客户端通过 REST 读取权威状态并按 id 合并。

use std::collections::HashSet;

use axum::extract::ws::{Message as WsMessage, WebSocket};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use application::{EventBroadcast, Topic};
use domain::ChatId;

use crate::state::AppState;

/// 客户端订阅指令。
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientCommand {
    /// 客服会话：加入全局队列组
    JoinQueue,
    /// 加入某个会话的房间（客户或正在查看的客服）
    JoinChat {
        #[serde(rename = "chatId")]
        chat_id: Uuid,
    },
}

pub async fn serve(socket: WebSocket, state: AppState) {
    let mut events = state.broadcaster.subscribe();
    let (mut sink, mut incoming) = socket.split();

    // 本连接当前订阅的广播组；连接关闭时随栈帧一起消失。
    let mut topics: HashSet<Topic> = HashSet::new();

    loop {
        tokio::select! {
            inbound = incoming.next() => {
                match inbound {
                    Some(Ok(WsMessage::Text(text))) => {
                        match serde_json::from_str::<ClientCommand>(&text) {
                            Ok(ClientCommand::JoinQueue) => {
                                topics.insert(Topic::Queue);
                            }
                            Ok(ClientCommand::JoinChat { chat_id }) => {
                                topics.insert(Topic::Chat(ChatId::from(chat_id)));
                            }
                            Err(err) => {
                                // 无效指令不终止连接，仅记录。
                                tracing::debug!(error = %err, "ignoring malformed ws command");
                            }
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        tracing::debug!(error = %err, "websocket receive error");
                        break;
                    }
                }
            }
            event = events.recv() => {
                match event {
                    Ok(EventBroadcast { topic, event }) => {
                        if !topics.contains(&topic) {
                            continue;
                        }
                        let payload = match serde_json::to_string(&event) {
                            Ok(json) => json,
                            Err(err) => {
                                tracing::warn!(error = %err, "failed to serialize event payload");
                                continue;
                            }
                        };
                        if sink.send(WsMessage::Text(payload.into())).await.is_err() {
                            break;
                        }
                    }
                    // 落后于广播缓冲：丢掉错过的事件继续，客户端靠 REST 补齐。
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "websocket receiver lagged, events dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }
}
