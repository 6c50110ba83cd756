use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use upfluence_db::models::{MessageRow, NewMessage};
use upfluence_types::api::{MessageFolder, MessageResponse, SendMessageRequest, SessionClaims};
use upfluence_types::models::{Message, MessageStatus};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::{AppState, blocking_db};

const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 200;

#[derive(Debug, Deserialize)]
pub struct MessageListQuery {
    #[serde(default)]
    pub folder: MessageFolder,
    pub limit: Option<u32>,
}

fn to_response(message: Message, counterpart_name: String) -> MessageResponse {
    MessageResponse {
        id: message.id,
        sender_id: message.sender_id,
        receiver_id: message.receiver_id,
        counterpart_name,
        campaign_id: message.campaign_id,
        subject: message.subject,
        content: message.content,
        status: message.status,
        created_at: message.created_at,
    }
}

pub fn validate_message(sender_id: Uuid, req: SendMessageRequest) -> ApiResult<NewMessage> {
    if req.receiver_id == sender_id {
        return Err(ApiError::validation("Cannot send a message to yourself"));
    }
    let subject = req.subject.trim().to_string();
    if subject.is_empty() {
        return Err(ApiError::validation("Subject is required"));
    }
    if req.content.trim().is_empty() {
        return Err(ApiError::validation("Content is required"));
    }

    Ok(NewMessage {
        sender_id,
        receiver_id: req.receiver_id,
        campaign_id: req.campaign_id,
        subject,
        content: req.content,
        status: MessageStatus::Sent,
    })
}

pub async fn send_message(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    ApiJson(req): ApiJson<SendMessageRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let message = validate_message(claims.sub, req)?;

    let sent = blocking_db(&state, move |db| {
        let Some(receiver) = db.get_user_by_id(message.receiver_id)? else {
            return Ok(Err(ApiError::NotFound("receiver")));
        };
        if let Some(campaign_id) = message.campaign_id {
            if db.get_campaign(campaign_id)?.is_none() {
                return Ok(Err(ApiError::NotFound("campaign")));
            }
        }
        let stored = db.insert_message(&message)?;
        Ok(Ok(to_response(stored, receiver.name)))
    })
    .await??;

    info!(message_id = %sent.id, sender_id = %sent.sender_id, receiver_id = %sent.receiver_id, "Message sent");
    Ok((StatusCode::CREATED, Json(sent)))
}

pub async fn list_messages(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Query(query): Query<MessageListQuery>,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let user_id = claims.sub;
    let folder = query.folder;

    let rows = blocking_db(&state, move |db| db.list_messages(user_id, folder, limit)).await?;
    let messages = rows
        .into_iter()
        .map(|MessageRow { message, counterpart_name }| to_response(message, counterpart_name))
        .collect();
    Ok(Json(messages))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let receiver_id = claims.sub;
    let updated = blocking_db(&state, move |db| db.mark_message_read(id, receiver_id)).await?;
    if !updated {
        return Err(ApiError::NotFound("message"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(receiver_id: Uuid) -> SendMessageRequest {
        SendMessageRequest {
            receiver_id,
            campaign_id: None,
            subject: "Collaboration Opportunity".into(),
            content: "Hi Sarah! We love your content.".into(),
        }
    }

    #[test]
    fn valid_message_is_sent_status() {
        let sender = Uuid::new_v4();
        let message = validate_message(sender, request(Uuid::new_v4())).unwrap();
        assert_eq!(message.status, MessageStatus::Sent);
        assert_eq!(message.sender_id, sender);
    }

    #[test]
    fn rejects_self_and_blank_messages() {
        let me = Uuid::new_v4();
        assert!(matches!(validate_message(me, request(me)), Err(ApiError::Validation(_))));

        let mut blank_subject = request(Uuid::new_v4());
        blank_subject.subject = "  ".into();
        assert!(validate_message(me, blank_subject).is_err());

        let mut blank_content = request(Uuid::new_v4());
        blank_content.content = String::new();
        assert!(validate_message(me, blank_content).is_err());
    }
}
