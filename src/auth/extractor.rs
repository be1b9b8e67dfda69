use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use subtle::ConstantTimeEq;

use crate::auth::jwt;
use crate::error::AppError;
use crate::state::SharedState;

pub const TRIGGER_SECRET_HEADER: &str = "x-trigger-secret";

/// Verified identity of a direct caller. The token is checked for signature
/// and expiry and then trusted as-is.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub uid: String,
}

impl FromRequestParts<SharedState> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AppError::Unauthenticated("You must be logged in to send feedback.".to_string())
                })?;

        let claims = jwt::decode_token(bearer.token(), &state.config.auth_secret).map_err(|e| {
            tracing::debug!("Rejected identity token: {e}");
            AppError::Unauthenticated("Invalid or expired identity token.".to_string())
        })?;

        if claims.sub.is_empty() {
            return Err(AppError::Unauthenticated(
                "Identity token has no subject.".to_string(),
            ));
        }

        Ok(CallerIdentity { uid: claims.sub })
    }
}

/// Guards the document trigger route. Passes unconditionally when no trigger
/// secret is configured.
#[derive(Debug, Clone, Copy)]
pub struct TriggerAuthorized;

impl FromRequestParts<SharedState> for TriggerAuthorized {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.trigger_secret.as_deref() else {
            return Ok(TriggerAuthorized);
        };

        let provided = parts
            .headers
            .get(TRIGGER_SECRET_HEADER)
            .map(|v| v.as_bytes())
            .unwrap_or_default();

        if bool::from(provided.ct_eq(expected.as_bytes())) {
            Ok(TriggerAuthorized)
        } else {
            Err(AppError::Unauthenticated(
                "Invalid trigger secret.".to_string(),
            ))
        }
    }
}
