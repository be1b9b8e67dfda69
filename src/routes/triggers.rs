use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use bytes::Bytes;
use lettre::message::Mailbox;
use serde_json::{json, Value};

use crate::auth::extractor::TriggerAuthorized;
use crate::email::OutgoingMail;
use crate::error::AppError;
use crate::feedback::ledger::{dedup_key, NotificationKind};
use crate::feedback::record::FeedbackCreatedEvent;
use crate::state::SharedState;

/// Handles a "document created" event for the `feedback` collection.
///
/// Malformed records are logged and acknowledged so the platform does not
/// redeliver them forever. Send failures return an error so it does.
pub async fn feedback_created(
    State(state): State<SharedState>,
    _auth: TriggerAuthorized,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, AppError> {
    let body = body?;
    let event: FeedbackCreatedEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::InvalidArgument(format!("Invalid trigger event: {e}")))?;

    let Some(record_id) = event.record_id() else {
        tracing::debug!("Ignoring event for document {}", event.document);
        return Ok(Json(json!({ "status": "ignored" })));
    };

    let submission = match event.to_submission() {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(
                "Skipping feedback record {record_id} (event={:?}): {e}",
                event.event_id
            );
            return Ok(Json(json!({ "status": "skipped", "reason": e.to_string() })));
        }
    };

    let owner = &state.config.owner_email;

    let owner_mail = submission
        .owner_notification(owner)
        .map_err(AppError::Internal)?;

    let confirmation = match submission.confirmation(owner).map_err(AppError::Internal)? {
        Some(mail) if mail.to.parse::<Mailbox>().is_err() => {
            tracing::warn!(
                "Record {record_id} has an unusable reply address, skipping confirmation"
            );
            None
        }
        other => other,
    };

    let mut sent = 0;
    let mut duplicates = 0;

    if deliver_once(&state, record_id, NotificationKind::Owner, &owner_mail).await? {
        sent += 1;
    } else {
        duplicates += 1;
    }

    if let Some(mail) = &confirmation {
        if deliver_once(&state, record_id, NotificationKind::Confirmation, mail).await? {
            sent += 1;
        } else {
            duplicates += 1;
        }
    }

    if sent == 0 {
        tracing::info!("Record {record_id} already notified, ignoring redelivery");
        return Ok(Json(json!({ "status": "duplicate" })));
    }

    tracing::info!("Record {record_id} notified ({sent} sent, {duplicates} already sent)");

    Ok(Json(json!({ "status": "notified", "emails_sent": sent })))
}

/// Send `mail` unless the ledger says this email for this record already went
/// out. Returns whether it was sent now.
async fn deliver_once(
    state: &SharedState,
    record_id: &str,
    kind: NotificationKind,
    mail: &OutgoingMail,
) -> Result<bool, AppError> {
    let key = dedup_key(record_id, kind);
    let Some(claim) = state.ledger.claim(&key) else {
        return Ok(false);
    };

    state.mailer.send(mail).await.map_err(|e| {
        AppError::MailDelivery(format!("Failed to send {kind:?} email for record {record_id}: {e}"))
    })?;

    claim.complete();
    Ok(true)
}
