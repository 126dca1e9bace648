/// Association browsing routes.
pub(crate) mod associations;

/// Authentication and account lifecycle routes.
pub(crate) mod auth;

/// Donation ledger routes.
pub(crate) mod donations;

/// Event management routes.
pub(crate) mod events;

/// Rating routes.
pub(crate) mod ratings;

/// Profile management routes.
pub(crate) mod users;

/// Event roster routes.
pub(crate) mod volunteers;

#[cfg(test)]
mod tests {
    use crate::testing::{
        create_association_account, create_database, create_event, create_volunteer, test_state,
        RequestBodyExt, ResponseBodyExt,
    };

    use assert_json::assert_json;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use db::OffsetDateTime;
    use serde_json::json;
    use time::Duration;
    use tower::{Service, ServiceExt};

    // Exercises the whole volunteering lifecycle across handler groups:
    // a capacity-one event fills up, the second volunteer is turned away,
    // the participant rates the association exactly once and the summary
    // reflects that single rating.
    #[tokio::test]
    async fn volunteering_lifecycle() {
        let db = create_database().await;

        let (_, association_id, _) = create_association_account(&db, "org@example.com", "G12345678").await;
        let event_id = create_event(
            &db,
            association_id,
            OffsetDateTime::now_utc() - Duration::hours(2),
            Some(1),
        )
        .await;

        let (_, first_token) = create_volunteer(&db, "first@example.com").await;
        let (_, second_token) = create_volunteer(&db, "second@example.com").await;

        let mut service = crate::app_router(test_state(db));

        let response = service
            .call(
                Request::builder()
                    .method("POST")
                    .uri(format!("/events/{event_id}/join"))
                    .header("Authorization", format!("Bearer {first_token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let response = service
            .call(
                Request::builder()
                    .method("POST")
                    .uri(format!("/events/{event_id}/join"))
                    .header("Authorization", format!("Bearer {second_token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = service
            .call(
                Request::builder()
                    .method("POST")
                    .uri("/ratings")
                    .header("Authorization", format!("Bearer {first_token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({
                        "event_id": event_id,
                        "rating": 5,
                        "comment": "Great cleanup",
                    })))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let response = service
            .call(
                Request::builder()
                    .method("POST")
                    .uri("/ratings")
                    .header("Authorization", format!("Bearer {first_token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({
                        "event_id": event_id,
                        "rating": 4,
                    })))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = service
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/ratings/association/{association_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_json!(response.json().await, {
            "summary": {
                "total_ratings": 1,
                "average_rating": 5.0,
            },
        });
    }
}
