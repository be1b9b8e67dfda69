pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod feedback;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::email::Mailer;
use crate::feedback::ledger::NotificationLedger;
use crate::state::{AppState, SharedState};

pub fn build_app(config: Config, mailer: Arc<dyn Mailer>) -> (Router, SharedState) {
    let state: SharedState = Arc::new(AppState {
        config,
        mailer,
        ledger: NotificationLedger::new(),
    });

    if state.config.trigger_secret.is_none() {
        tracing::warn!("CHRONO_TRIGGER_SECRET not set, trigger route accepts unauthenticated events");
    }

    let app = Router::new()
        .merge(routes::api_routes())
        .merge(routes::trigger_routes())
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(state.config.max_body_size))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                )),
        )
        .with_state(state.clone());

    (app, state)
}

/// Periodically drop ledger entries older than the configured retention.
pub fn spawn_ledger_cleanup(state: SharedState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let retention = Duration::from_secs(state.config.dedup_ttl_secs);
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            state.ledger.cleanup(retention);
        }
    })
}

async fn health() -> &'static str {
    "ok"
}
