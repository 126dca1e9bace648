use axum::{
    extract::{Query, State},
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{event, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use derive_more::{Display, Error, From};

use crate::{pagination::Pagination, state::AppState};

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum EventListError {
    DatabaseError(DbErr),
}

/// Active events only, soonest first.
pub(super) async fn list(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<event::Model>>, EventListError> {
    let events = event::Entity::find()
        .filter(event::Column::IsActive.eq(true))
        .order_by_asc(event::Column::Date)
        .limit(pagination.limit())
        .offset(pagination.offset())
        .all(&*state.db)
        .await?;

    Ok(Json(events))
}

#[cfg(test)]
mod tests {
    use crate::testing::{
        create_association_account, create_database, create_event, test_state, ResponseBodyExt,
    };

    use assert_json::assert_json;
    use axum::{body::Body, http::Request};
    use db::{event, ActiveModelTrait, ActiveValue, EntityTrait, IntoActiveModel, OffsetDateTime};
    use time::Duration;
    use tower::ServiceExt;

    #[tokio::test]
    async fn skips_deactivated_events() {
        let db = create_database().await;

        let (_, association_id, _) =
            create_association_account(&db, "org@example.com", "G12345678").await;

        let active_id = create_event(
            &db,
            association_id,
            OffsetDateTime::now_utc() + Duration::days(1),
            None,
        )
        .await;

        let inactive_id = create_event(
            &db,
            association_id,
            OffsetDateTime::now_utc() + Duration::days(2),
            None,
        )
        .await;

        let inactive = event::Entity::find_by_id(inactive_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();

        let mut active_model = inactive.into_active_model();
        active_model.is_active = ActiveValue::Set(false);
        active_model.update(&db).await.unwrap();

        let response = crate::app_router(test_state(db))
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/events")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_json!(response.json().await, [
            { "id": active_id },
        ]);
    }
}
