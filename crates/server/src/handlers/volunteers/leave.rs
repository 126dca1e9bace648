use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};
use axum_derive_error::ErrorResponse;
use db::{event_volunteer, DbErr, EntityTrait};
use derive_more::{Display, Error, From};

use crate::{auth::AuthenticatedUser, state::AppState};

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum EventLeaveError {
    DatabaseError(DbErr),

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "not a participant of this event")]
    NotJoined,
}

/// Event leave handler.
///
/// Leaving is allowed at any time, including after the event date;
/// attendance corrections go through the same route.
pub(super) async fn leave(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<(), EventLeaveError> {
    let result = event_volunteer::Entity::delete_by_id((event_id, current_user.id()))
        .exec(&*state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(EventLeaveError::NotJoined);
    }

    Ok(())
}
