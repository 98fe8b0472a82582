use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::{
    errors::{ApiError, ServiceError},
    handlers::AppState,
    services::{chat::ChatReply, prompt::ChatMessage},
};

const MESSAGE_REQUIRED: &str = "Mensaje requerido";

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub mensaje: Option<String>,
    /// Prior turns, oldest first
    #[serde(default)]
    pub historial: Vec<ChatMessage>,
}

async fn send_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection, "rejected chat request body");
        ApiError::Chat(ServiceError::InvalidRequest(MESSAGE_REQUIRED.to_string()))
    })?;

    let mensaje = request.mensaje.unwrap_or_default();
    state
        .chat
        .respond(&mensaje, &request.historial)
        .await
        .map(Json)
        .map_err(ApiError::Chat)
}

pub fn chat_routes() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(send_message))
}
