use std::sync::Arc;

use crate::config::Config;
use crate::email::Mailer;
use crate::feedback::ledger::NotificationLedger;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub mailer: Arc<dyn Mailer>,
    pub ledger: NotificationLedger,
}
