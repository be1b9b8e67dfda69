pub mod ledger;
pub mod record;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::email::templates;
use crate::email::OutgoingMail;

pub const ANONYMOUS_NAME: &str = "Anonymous User";
pub const NO_EMAIL_PLACEHOLDER: &str = "No email provided";

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Verified caller uid; only known on the direct path.
    pub submitter: Option<String>,
}

/// Body of a direct feedback call. Every field is optional here so that a
/// missing field is reported as an invalid argument rather than a decode error.
#[derive(Debug, Default, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl FeedbackRequest {
    pub fn parse(body: &[u8]) -> Result<Self, String> {
        serde_json::from_slice(body).map_err(|e| format!("Invalid feedback payload: {e}"))
    }

    /// Check that all three fields are present and non-blank, then bind the
    /// submission to the verified caller.
    pub fn validate(self, submitter: &str) -> Result<FeedbackSubmission, String> {
        let name = required("name", self.name)?;
        let email = required("email", self.email)?;
        let message = required("message", self.message)?;

        Ok(FeedbackSubmission {
            name,
            email,
            message,
            timestamp: Utc::now(),
            submitter: Some(submitter.to_string()),
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| format!("Missing required field: {field}"))
}

impl FeedbackSubmission {
    pub fn has_reply_address(&self) -> bool {
        self.email != NO_EMAIL_PLACEHOLDER
    }

    fn submitted_at(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }

    /// Plain-text notification for a direct call, sent from the owner to the owner.
    pub fn direct_notification(&self, owner: &str) -> OutgoingMail {
        let uid = self.submitter.as_deref().unwrap_or_default();
        OutgoingMail {
            from: owner.to_string(),
            to: owner.to_string(),
            subject: format!("Chrono Feedback from {}", self.name),
            text: templates::render_direct_feedback(&self.name, &self.email, &self.message, uid),
            html: None,
        }
    }

    pub fn owner_notification(&self, owner: &str) -> Result<OutgoingMail, String> {
        let submitted = self.submitted_at();
        Ok(OutgoingMail {
            from: owner.to_string(),
            to: owner.to_string(),
            subject: format!("New Chrono Feedback from {}", self.name),
            text: templates::render_owner_notification_text(
                &self.name,
                &self.email,
                &self.message,
                &submitted,
            ),
            html: Some(templates::render_owner_notification_html(
                &self.name,
                &self.email,
                &self.message,
                &submitted,
            )?),
        })
    }

    /// Confirmation back to the submitter. `None` when no reply address was given.
    pub fn confirmation(&self, owner: &str) -> Result<Option<OutgoingMail>, String> {
        if !self.has_reply_address() {
            return Ok(None);
        }

        Ok(Some(OutgoingMail {
            from: owner.to_string(),
            to: self.email.clone(),
            subject: "Thanks for your feedback on Chrono".to_string(),
            text: templates::render_confirmation_text(&self.name, &self.message),
            html: Some(templates::render_confirmation_html(&self.name, &self.message)?),
        }))
    }
}
