mod auth;
mod clock;
mod eligibility;
mod handlers;
mod pagination;
mod passwords;
mod state;
mod validation;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use axum::{Router, Server};
use common::{
    config::Config,
    logging,
    mail::{Mailer, NoopMailer, SendGridMailer},
    payments::{CheckoutProvider, DisabledCheckout, StripeCheckout},
};
use db::Database;
use state::AppState;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::new()?;

    logging::init(&config);

    let Some(server_config) = config.server.as_ref() else {
        return Err(anyhow::Error::msg("unable to load server config"));
    };

    info!("connecting to database");
    let database = Arc::new(Database::connect(&config.database.url).await?);
    let server = Server::bind(&server_config.address);

    let checkout: Arc<dyn CheckoutProvider> = match config.payments.as_ref() {
        Some(payments) => Arc::new(StripeCheckout::new(payments)),
        None => {
            warn!("payments are not configured, donations will stay pending");
            Arc::new(DisabledCheckout)
        }
    };

    let mailer: Arc<dyn Mailer> = match config.mail.as_ref() {
        Some(mail) => Arc::new(SendGridMailer::new(mail)),
        None => Arc::new(NoopMailer),
    };

    let state = AppState {
        db: database,
        config: Arc::new(config),
        clock: Arc::new(clock::SystemClock),
        checkout,
        mailer,
    };

    server
        .serve(app_router(state).into_make_service())
        .await?;

    Ok(())
}

fn app_router(state: AppState) -> Router {
    Router::new()
        .nest("/auth", handlers::auth::routes())
        .nest("/users", handlers::users::routes(state.clone()))
        .nest("/associations", handlers::associations::routes())
        .nest(
            "/events",
            handlers::events::routes(state.clone())
                .merge(handlers::volunteers::routes(state.clone())),
        )
        .nest("/ratings", handlers::ratings::routes(state.clone()))
        .nest("/donations", handlers::donations::routes(state.clone()))
        .with_state(state)
}
