use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use bytes::Bytes;
use serde_json::{json, Value};

use crate::auth::extractor::CallerIdentity;
use crate::error::AppError;
use crate::feedback::FeedbackRequest;
use crate::state::SharedState;

/// Direct feedback call. Identity is extracted before the body is read, so an
/// unauthenticated caller never gets payload validation errors.
pub async fn send_feedback(
    State(state): State<SharedState>,
    caller: CallerIdentity,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, AppError> {
    let body = body?;
    let submission = FeedbackRequest::parse(&body)
        .and_then(|request| request.validate(&caller.uid))
        .map_err(AppError::InvalidArgument)?;

    let mail = submission.direct_notification(&state.config.owner_email);

    state
        .mailer
        .send(&mail)
        .await
        .map_err(|e| AppError::MailDelivery(format!("Error sending feedback email: {e}")))?;

    tracing::info!("Feedback from uid={} delivered to owner", caller.uid);

    Ok(Json(json!({ "success": true })))
}
