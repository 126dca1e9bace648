use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    event, event_volunteer, sea_orm, user, ColumnTrait, DbErr, EntityTrait, FromQueryResult,
    PrimitiveDateTime, QueryFilter, QueryOrder, QuerySelect, SelectExt, TransactionErrorExt,
    TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::Serialize;

use crate::state::AppState;

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum RosterListError {
    DatabaseError(DbErr),

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "event not found")]
    EventNotFound,
}

#[derive(FromQueryResult, Serialize)]
pub(super) struct RosterEntry {
    id: i64,
    name: Option<String>,
    lastname: Option<String>,
    joined_at: PrimitiveDateTime,
}

pub(super) async fn list(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<RosterEntry>>, RosterListError> {
    state
        .db
        .transaction(|txn| {
            Box::pin(async move {
                let event_exists = event::Entity::find_by_id(event_id)
                    .select_only()
                    .exists(txn)
                    .await?;

                if !event_exists {
                    return Err(RosterListError::EventNotFound);
                }

                let roster = event_volunteer::Entity::find()
                    .filter(event_volunteer::Column::EventId.eq(event_id))
                    .inner_join(user::Entity)
                    .select_only()
                    .column_as(user::Column::Id, "id")
                    .column_as(user::Column::Name, "name")
                    .column_as(user::Column::Lastname, "lastname")
                    .column(event_volunteer::Column::JoinedAt)
                    .order_by_asc(event_volunteer::Column::JoinedAt)
                    .into_model::<RosterEntry>()
                    .all(txn)
                    .await?;

                Ok(Json(roster))
            })
        })
        .await
        .into_raw_result()
}
