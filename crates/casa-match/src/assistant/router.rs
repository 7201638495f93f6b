use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::AppError;

use super::conversation::{AssistantConversation, AssistantReply};
use super::provider::{AssistantProvider, ChatMessage};

pub type SharedConversation = Arc<Mutex<AssistantConversation<dyn AssistantProvider>>>;

/// Router for the chat endpoints.
pub fn assistant_router(conversation: SharedConversation) -> Router {
    Router::new()
        .route(
            "/api/v1/assistant/messages",
            get(transcript_handler).post(send_handler),
        )
        .with_state(conversation)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SendMessage {
    pub(crate) message: String,
}

pub(crate) async fn send_handler(
    State(conversation): State<SharedConversation>,
    Json(payload): Json<SendMessage>,
) -> Result<Json<AssistantReply>, AppError> {
    let mut conversation = conversation.lock().await;
    conversation
        .ask(&payload.message)
        .await
        .map(Json)
        .ok_or_else(|| AppError::InvalidInput("message must not be empty".to_string()))
}

pub(crate) async fn transcript_handler(
    State(conversation): State<SharedConversation>,
) -> Json<Vec<ChatMessage>> {
    Json(conversation.lock().await.transcript().to_vec())
}
