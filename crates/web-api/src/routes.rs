use axum::{
    extract::{Path, State, WebSocketUpgrade},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use application::services::{
    ClaimChatRequest, GetMessagesRequest, LoginRequest, RegisterOfficerRequest, SendMessageRequest,
};
use application::{ChatDto, MessageDto, OfficerDto};
use domain::SenderType;

use crate::{error::ApiError, state::AppState, ws_connection};

// 必填字段用 Option 接收，由处理器显式返回 400，
// 与原有接口的 "xxx is required" 行为一致。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginPayload {
    customer_id: Option<String>,
    officer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateOfficerPayload {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendMessagePayload {
    sender_type: SenderType,
    sender_id: String,
    content: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .route("/ws", get(websocket_upgrade))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/customers/login", post(login))
        .route("/officers", post(create_officer))
        .route("/officers/queue", get(get_queue))
        .route("/officers/{officer_id}/chats", get(get_officer_chats))
        .route("/officers/{officer_id}/claim/{chat_id}", post(claim_chat))
        .route(
            "/chats/{chat_id}/messages",
            post(send_message).get(get_messages),
        )
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<ChatDto>, ApiError> {
    let customer_id = payload
        .customer_id
        .ok_or_else(|| ApiError::bad_request("customerId is required"))?;

    let chat = state
        .queue_service
        .login(LoginRequest {
            customer_id,
            officer_id: payload.officer_id,
        })
        .await?;

    Ok(Json(ChatDto::from(&chat)))
}

async fn create_officer(
    State(state): State<AppState>,
    Json(payload): Json<CreateOfficerPayload>,
) -> Result<(StatusCode, Json<OfficerDto>), ApiError> {
    let id = payload
        .id
        .ok_or_else(|| ApiError::bad_request("id is required"))?;

    let officer = state
        .officer_service
        .register(RegisterOfficerRequest { id })
        .await?;

    Ok((StatusCode::CREATED, Json(OfficerDto::from(&officer))))
}

async fn get_queue(State(state): State<AppState>) -> Result<Json<Vec<ChatDto>>, ApiError> {
    let chats = state.queue_service.list_queue().await?;
    Ok(Json(chats.iter().map(ChatDto::from).collect()))
}

async fn get_officer_chats(
    State(state): State<AppState>,
    Path(officer_id): Path<String>,
) -> Result<Json<Vec<ChatDto>>, ApiError> {
    let chats = state.queue_service.list_assigned(officer_id).await?;
    Ok(Json(chats.iter().map(ChatDto::from).collect()))
}

async fn claim_chat(
    State(state): State<AppState>,
    Path((officer_id, chat_id)): Path<(String, Uuid)>,
) -> Result<Json<ChatDto>, ApiError> {
    let chat = state
        .queue_service
        .claim_chat(ClaimChatRequest {
            chat_id,
            officer_id,
        })
        .await?;

    Ok(Json(ChatDto::from(&chat)))
}

async fn send_message(
    State(state): State<AppState>,
    Path(chat_id): Path<Uuid>,
    Json(payload): Json<SendMessagePayload>,
) -> Result<Json<MessageDto>, ApiError> {
    let message = state
        .message_service
        .send_message(SendMessageRequest {
            chat_id,
            sender_type: payload.sender_type,
            sender_id: payload.sender_id,
            content: payload.content,
        })
        .await?;

    Ok(Json(MessageDto::from(&message)))
}

async fn get_messages(
    State(state): State<AppState>,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let messages = state
        .message_service
        .get_messages(GetMessagesRequest { chat_id })
        .await?;

    Ok(Json(messages.iter().map(MessageDto::from).collect()))
}

async fn websocket_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    Ok(ws.on_upgrade(move |socket| ws_connection::serve(socket, state)))
}
