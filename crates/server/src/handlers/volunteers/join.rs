use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};
use axum_derive_error::ErrorResponse;
use db::{
    event, event_volunteer, ActiveValue, DbErr, EntityTrait, QuerySelect, TransactionErrorExt,
    TransactionTrait,
};
use derive_more::{Display, Error, From};

use crate::{
    auth::AuthenticatedUser,
    eligibility::{self, JoinDenial},
    state::AppState,
};

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum EventJoinError {
    DatabaseError(DbErr),

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "event not found")]
    EventNotFound,

    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "event is no longer active")]
    EventInactive,

    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "already joined this event")]
    AlreadyJoined,

    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "event roster is full")]
    EventFull,
}

impl From<JoinDenial> for EventJoinError {
    fn from(denial: JoinDenial) -> Self {
        match denial {
            JoinDenial::EventInactive => EventJoinError::EventInactive,
            JoinDenial::AlreadyJoined => EventJoinError::AlreadyJoined,
            JoinDenial::EventFull => EventJoinError::EventFull,
        }
    }
}

/// Event join handler.
///
/// The event row is locked before the capacity check, so the roster
/// count and the insert are atomic with respect to competing joins.
pub(super) async fn join(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<StatusCode, EventJoinError> {
    let now = state.clock.now_naive();
    let user_id = current_user.id();

    state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                let event = event::Entity::find_by_id(event_id)
                    .lock_exclusive()
                    .one(txn)
                    .await?
                    .ok_or(EventJoinError::EventNotFound)?;

                if let Err(denial) = eligibility::can_join(txn, &event, user_id).await? {
                    return Err(denial.into());
                }

                event_volunteer::Entity::insert(event_volunteer::ActiveModel {
                    event_id: ActiveValue::Set(event.id),
                    volunteer_id: ActiveValue::Set(user_id),
                    joined_at: ActiveValue::Set(now),
                })
                .exec_without_returning(txn)
                .await?;

                Ok(StatusCode::CREATED)
            })
        })
        .await
        .into_raw_result()
}
