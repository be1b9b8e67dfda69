pub mod feedback;
pub mod triggers;

use axum::routing::post;
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new().route("/v1/feedback", post(feedback::send_feedback))
}

pub fn trigger_routes() -> Router<SharedState> {
    Router::new().route(
        "/v1/triggers/feedback-created",
        post(triggers::feedback_created),
    )
}
