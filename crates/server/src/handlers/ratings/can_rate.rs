use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    association, event, DbErr, EntityTrait, QuerySelect, SelectExt, TransactionErrorExt,
    TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::Serialize;

use crate::{auth::AuthenticatedUser, eligibility, state::AppState};

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum CanRateError {
    DatabaseError(DbErr),

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "association not found")]
    AssociationNotFound,
}

#[derive(Serialize)]
pub(super) struct CanRateResponse {
    can_rate: bool,

    /// Concluded, participated-in events still awaiting a rating.
    unrated_events: Vec<event::Model>,
}

pub(super) async fn can_rate(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(association_id): Path<i64>,
) -> Result<Json<CanRateResponse>, CanRateError> {
    let now = state.clock.now_naive();
    let user_id = current_user.id();

    state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                let association_exists = association::Entity::find_by_id(association_id)
                    .select_only()
                    .exists(txn)
                    .await?;

                if !association_exists {
                    return Err(CanRateError::AssociationNotFound);
                }

                let unrated_events =
                    eligibility::unrated_events(txn, user_id, association_id, now).await?;

                Ok(Json(CanRateResponse {
                    can_rate: !unrated_events.is_empty(),
                    unrated_events,
                }))
            })
        })
        .await
        .into_raw_result()
}
