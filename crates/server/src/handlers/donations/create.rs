use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use common::payments::{CheckoutError, CheckoutParams};
use db::{
    association, donation, event, ActiveModelTrait, ActiveValue, DbErr, Decimal, EntityTrait,
    IntoActiveModel, QuerySelect, SelectExt, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::{auth::AuthenticatedUser, state::AppState};

/// Largest accepted donation in major currency units.
const MAX_AMOUNT: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum DonationCreationError {
    DatabaseError(DbErr),

    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "amount must be greater than 0 and at most 10000")]
    InvalidAmount,

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "association not found")]
    AssociationNotFound,

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "event not found")]
    EventNotFound,

    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "event belongs to another association")]
    EventAssociationMismatch,

    #[status(StatusCode::BAD_GATEWAY)]
    CheckoutFailed(CheckoutError),
}

#[derive(Deserialize)]
pub(super) struct DonationCreationRequest {
    amount: Decimal,
    description: Option<String>,
    association_id: i64,
    event_id: Option<i64>,
}

#[derive(Serialize)]
pub(super) struct DonationCreationResponse {
    donation_id: i64,
    checkout_url: String,
    status: donation::Status,
}

fn validate_amount(amount: Decimal) -> Result<(), DonationCreationError> {
    if amount <= Decimal::ZERO || amount > MAX_AMOUNT || amount != amount.round_dp(2) {
        return Err(DonationCreationError::InvalidAmount);
    }

    Ok(())
}

/// Donation creation handler.
///
/// The ledger entry is committed as `Pending` before the processor is
/// contacted, so a checkout failure leaves a row that can still be
/// settled through the manual fallback.
pub(super) async fn create(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<DonationCreationRequest>,
) -> Result<(StatusCode, Json<DonationCreationResponse>), DonationCreationError> {
    validate_amount(request.amount)?;

    let now = state.clock.now_naive();
    let donor_id = current_user.id();

    let donation = state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                let association_exists = association::Entity::find_by_id(request.association_id)
                    .select_only()
                    .exists(txn)
                    .await?;

                if !association_exists {
                    return Err(DonationCreationError::AssociationNotFound);
                }

                if let Some(event_id) = request.event_id {
                    let association_id: i64 = event::Entity::find_by_id(event_id)
                        .select_only()
                        .column(event::Column::AssociationId)
                        .into_tuple()
                        .one(txn)
                        .await?
                        .ok_or(DonationCreationError::EventNotFound)?;

                    if association_id != request.association_id {
                        return Err(DonationCreationError::EventAssociationMismatch);
                    }
                }

                let donation = donation::Entity::insert(donation::ActiveModel {
                    amount: ActiveValue::Set(request.amount),
                    currency: ActiveValue::Set(String::from("EUR")),
                    description: ActiveValue::Set(request.description),
                    donor_id: ActiveValue::Set(donor_id),
                    association_id: ActiveValue::Set(request.association_id),
                    event_id: ActiveValue::Set(request.event_id),
                    status: ActiveValue::Set(donation::Status::Pending),
                    created_at: ActiveValue::Set(now),
                    ..Default::default()
                })
                .exec_with_returning(txn)
                .await?;

                Ok(donation)
            })
        })
        .await
        .into_raw_result()?;

    // Outside the transaction: the pending row must survive a failure
    // of the outbound call.
    let amount_minor = (donation.amount * Decimal::from(100))
        .to_i64()
        .ok_or(DonationCreationError::InvalidAmount)?;

    let base_url = state
        .config
        .frontend
        .as_ref()
        .map(|frontend| frontend.base_url.as_str())
        .unwrap_or("http://localhost:5173");

    let description = donation
        .description
        .clone()
        .unwrap_or_else(|| String::from("Donation"));

    let checkout = state
        .checkout
        .create_checkout(CheckoutParams {
            amount_minor,
            currency: "eur",
            description: &description,
            metadata: HashMap::from([(String::from("donation_id"), donation.id.to_string())]),
            success_url: &format!("{base_url}/donations/success"),
            cancel_url: &format!("{base_url}/donations/cancelled"),
        })
        .await?;

    let donation_id = donation.id;
    let checkout_url = checkout.checkout_url;

    state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                let mut active = donation.into_active_model();
                active.checkout_session_id = ActiveValue::Set(Some(checkout.session_id));
                active.update(txn).await?;

                Ok::<_, DbErr>(())
            })
        })
        .await
        .into_raw_result()?;

    Ok((
        StatusCode::CREATED,
        Json(DonationCreationResponse {
            donation_id,
            checkout_url,
            status: donation::Status::Pending,
        }),
    ))
}
