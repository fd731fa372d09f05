use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use bizdir_chat::{ChatTurn, Message};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_chat_error, not_configured, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ChatBody {
    /// Prior conversation, as returned by the previous call.
    #[serde(default)]
    pub messages: Vec<Message>,
    pub input: String,
}

pub(super) async fn send_message(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Result<Json<ApiResponse<ChatTurn>>, ApiError> {
    let Json(body) =
        body.map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.body_text()))?;
    let client = state
        .chat
        .as_ref()
        .ok_or_else(|| not_configured(req_id.0.clone(), "chat API key"))?;

    let turn = client
        .send(&body.messages, &body.input)
        .await
        .map_err(|e| map_chat_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, turn)))
}
