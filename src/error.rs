use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Unauthenticated(String),
    InvalidArgument(String),
    /// The mail relay refused or failed a send.
    MailDelivery(String),
    Internal(String),
}

impl AppError {
    /// Wire name of the error kind, as seen by callers.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Unauthenticated(_) => "unauthenticated",
            AppError::InvalidArgument(_) => "invalid-argument",
            AppError::MailDelivery(_) | AppError::Internal(_) => "internal",
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Unauthenticated(msg) => write!(f, "Unauthenticated: {msg}"),
            AppError::InvalidArgument(msg) => write!(f, "Invalid Argument: {msg}"),
            AppError::MailDelivery(msg) => write!(f, "Mail Delivery Error: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::MailDelivery(msg) => {
                tracing::error!("Mail delivery error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error sending feedback email.".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({
            "error": {
                "status": self.kind(),
                "message": message,
            }
        });
        (status, axum::Json(body)).into_response()
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        AppError::InvalidArgument(format!("Unreadable request body: {}", rejection.body_text()))
    }
}
