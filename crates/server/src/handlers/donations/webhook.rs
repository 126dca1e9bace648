use axum::{extract::State, http::HeaderMap, http::StatusCode};
use axum_derive_error::ErrorResponse;
use common::payments::{
    self,
    stripe::{EventObject, EventType, WebhookError},
};
use db::{donation, DbErr, TransactionErrorExt, TransactionTrait};
use derive_more::{Display, Error, From};
use tracing::{info, warn};

use crate::state::AppState;

use super::settle_by_session;

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum DonationWebhookError {
    DatabaseError(DbErr),

    #[status(StatusCode::SERVICE_UNAVAILABLE)]
    #[display(fmt = "payments are not configured")]
    PaymentsDisabled,

    #[status(StatusCode::BAD_REQUEST)]
    #[display(fmt = "missing webhook signature header")]
    MissingSignature,

    #[status(StatusCode::BAD_REQUEST)]
    InvalidSignature(WebhookError),
}

/// Payment processor notification handler.
///
/// Only checkout session outcomes are acted upon; every other event
/// type is acknowledged and dropped so the processor stops retrying.
pub(super) async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<(), DonationWebhookError> {
    let secret = state
        .config
        .payments
        .as_ref()
        .map(|payments| payments.webhook_secret.as_str())
        .ok_or(DonationWebhookError::PaymentsDisabled)?;

    let signature = headers
        .get("Stripe-Signature")
        .and_then(|value| value.to_str().ok())
        .ok_or(DonationWebhookError::MissingSignature)?;

    let event = payments::verify_webhook(&body, signature, secret)?;

    let outcome = match event.type_ {
        EventType::CheckoutSessionCompleted => donation::Status::Completed,
        EventType::CheckoutSessionExpired => donation::Status::Failed,
        _ => return Ok(()),
    };

    let EventObject::CheckoutSession(session) = event.data.object else {
        return Ok(());
    };

    let session_id = session.id.to_string();
    let now = state.clock.now_naive();

    let settled = state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                settle_by_session(txn, &session_id, outcome, now).await
            })
        })
        .await
        .into_raw_result()?;

    match settled {
        Some(donation) => info!(donation_id = donation.id, ?outcome, "donation settled"),
        None => warn!("webhook notification for an unknown checkout session"),
    }

    Ok(())
}
