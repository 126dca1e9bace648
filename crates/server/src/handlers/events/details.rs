use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{event, DbErr, EntityTrait, TransactionErrorExt, TransactionTrait};
use derive_more::{Display, Error, From};
use serde::Serialize;

use crate::{eligibility, state::AppState};

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum EventDetailsError {
    DatabaseError(DbErr),

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "event not found")]
    EventNotFound,
}

#[derive(Serialize)]
pub(super) struct EventDetailsResponse {
    #[serde(flatten)]
    event: event::Model,

    volunteers_count: i64,

    /// Remaining roster capacity; `null` for unbounded events.
    available_spots: Option<i64>,
}

pub(super) async fn details(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<EventDetailsResponse>, EventDetailsError> {
    state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                let event = event::Entity::find_by_id(event_id)
                    .one(txn)
                    .await?
                    .ok_or(EventDetailsError::EventNotFound)?;

                let volunteers_count = eligibility::roster_count(txn, event.id).await?;

                let available_spots = event
                    .max_volunteers
                    .map(|max| (max as i64 - volunteers_count).max(0));

                Ok(Json(EventDetailsResponse {
                    event,
                    volunteers_count,
                    available_spots,
                }))
            })
        })
        .await
        .into_raw_result()
}
