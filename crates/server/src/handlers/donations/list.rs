use axum::{
    extract::{Query, State},
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{donation, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use derive_more::{Display, Error, From};
use serde::Deserialize;

use crate::{pagination::Pagination, state::AppState};

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum DonationListError {
    DatabaseError(DbErr),
}

#[derive(Deserialize)]
pub(super) struct DonationFilter {
    user_id: Option<i64>,
    association_id: Option<i64>,
    event_id: Option<i64>,
    status: Option<donation::Status>,
}

/// Filtered ledger listing, newest first.
pub(super) async fn list(
    State(state): State<AppState>,
    Query(filter): Query<DonationFilter>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<donation::Model>>, DonationListError> {
    let mut query = donation::Entity::find();

    if let Some(user_id) = filter.user_id {
        query = query.filter(donation::Column::DonorId.eq(user_id));
    }

    if let Some(association_id) = filter.association_id {
        query = query.filter(donation::Column::AssociationId.eq(association_id));
    }

    if let Some(event_id) = filter.event_id {
        query = query.filter(donation::Column::EventId.eq(event_id));
    }

    if let Some(status) = filter.status {
        query = query.filter(donation::Column::Status.eq(status));
    }

    let donations = query
        .order_by_desc(donation::Column::CreatedAt)
        .order_by_desc(donation::Column::Id)
        .limit(pagination.limit())
        .offset(pagination.offset())
        .all(&*state.db)
        .await?;

    Ok(Json(donations))
}
