use std::sync::Arc;

use common::{config::Config, mail::Mailer, payments::CheckoutProvider};
use db::DatabaseConnection;

use crate::clock::Clock;

/// Shared application state.
///
/// External collaborators (clock, payment processor, mail delivery) are
/// carried as trait objects so tests can substitute deterministic
/// implementations.
#[derive(Clone)]
pub(crate) struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<Config>,
    pub clock: Arc<dyn Clock>,
    pub checkout: Arc<dyn CheckoutProvider>,
    pub mailer: Arc<dyn Mailer>,
}
