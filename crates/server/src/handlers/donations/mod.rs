/// Manual completion fallback route.
mod complete;

/// Donation creation route.
mod create;

/// Donation listing route.
mod list;

/// Donation statistics route.
mod statistics;

/// Payment processor webhook route.
mod webhook;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use db::{
    donation, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait,
    IntoActiveModel, PrimitiveDateTime, QueryFilter, QuerySelect,
};

use crate::{auth, state::AppState};

pub(crate) fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/webhook", post(webhook::webhook))
        .route("/statistics", get(statistics::statistics));

    let authenticated = Router::new()
        .route("/", post(create::create).get(list::list))
        .route("/complete", post(complete::complete))
        .route_layer(from_fn_with_state(
            state,
            auth::require_authentication::<false, false, _>,
        ));

    public.merge(authenticated)
}

/// Settle a pending donation found by its checkout session identifier.
///
/// The donation row is locked for the read-check-write sequence. A
/// donation already out of `Pending` is returned unchanged, which makes
/// double delivery of processor notifications harmless.
async fn settle_by_session(
    txn: &DatabaseTransaction,
    session_id: &str,
    outcome: donation::Status,
    now: PrimitiveDateTime,
) -> Result<Option<donation::Model>, DbErr> {
    let Some(donation) = donation::Entity::find()
        .filter(donation::Column::CheckoutSessionId.eq(session_id))
        .lock_exclusive()
        .one(txn)
        .await?
    else {
        return Ok(None);
    };

    if donation.status.is_terminal() {
        return Ok(Some(donation));
    }

    let mut active = donation.into_active_model();
    active.status = ActiveValue::Set(outcome);

    if outcome == donation::Status::Completed {
        active.completed_at = ActiveValue::Set(Some(now));
    }

    Ok(Some(active.update(txn).await?))
}
