//! Participation and rating eligibility rules.
//!
//! Every rule here is evaluated against a caller-supplied connection so
//! handlers can re-check inside the same transaction that performs the
//! guarded write.

use db::{
    event, event_volunteer, rating, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, PrimitiveDateTime, QueryFilter, QueryOrder, QuerySelect, QueryTrait, SelectExt,
};

/// Reason a join request was refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum JoinDenial {
    EventInactive,
    AlreadyJoined,
    EventFull,
}

/// Number of volunteers currently on the event roster.
pub(crate) async fn roster_count<C: ConnectionTrait + Send>(
    conn: &C,
    event_id: i64,
) -> Result<i64, DbErr> {
    let count = event_volunteer::Entity::find()
        .filter(event_volunteer::Column::EventId.eq(event_id))
        .count(conn)
        .await?;

    Ok(count as i64)
}

/// Decide whether a volunteer may join an event.
///
/// A past date does not block joining, attendance records may arrive
/// after the fact. The outer result is a query failure, the inner one
/// the decision itself.
pub(crate) async fn can_join<C: ConnectionTrait + Send>(
    conn: &C,
    event: &event::Model,
    user_id: i64,
) -> Result<Result<(), JoinDenial>, DbErr> {
    if !event.is_active {
        return Ok(Err(JoinDenial::EventInactive));
    }

    let already_joined = event_volunteer::Entity::find()
        .select_only()
        .filter(event_volunteer::Column::EventId.eq(event.id))
        .filter(event_volunteer::Column::VolunteerId.eq(user_id))
        .exists(conn)
        .await?;

    if already_joined {
        return Ok(Err(JoinDenial::AlreadyJoined));
    }

    if let Some(max_volunteers) = event.max_volunteers {
        if roster_count(conn, event.id).await? >= max_volunteers as i64 {
            return Ok(Err(JoinDenial::EventFull));
        }
    }

    Ok(Ok(()))
}

/// Events of one association that a volunteer participated in, which
/// have concluded and which the volunteer has not rated yet, oldest
/// first.
pub(crate) async fn unrated_events<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    association_id: i64,
    now: PrimitiveDateTime,
) -> Result<Vec<event::Model>, DbErr> {
    let rated = rating::Entity::find()
        .select_only()
        .column(rating::Column::EventId)
        .filter(rating::Column::UserId.eq(user_id))
        .into_query();

    event::Entity::find()
        .inner_join(event_volunteer::Entity)
        .filter(event_volunteer::Column::VolunteerId.eq(user_id))
        .filter(event::Column::AssociationId.eq(association_id))
        .filter(event::Column::Date.lt(now))
        .filter(event::Column::Id.not_in_subquery(rated))
        .order_by_asc(event::Column::Date)
        .all(conn)
        .await
}

/// Reason a rating was refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum RateDenial {
    EventNotConcluded,
    NotAParticipant,
    AlreadyRated,
}

/// Check that an event has concluded, that the volunteer participated
/// and that no rating from them exists yet. Returns the first reason
/// the rating is refused, or `None` when it may proceed.
pub(crate) async fn rate_denial<C: ConnectionTrait + Send>(
    conn: &C,
    user_id: i64,
    event: &event::Model,
    now: PrimitiveDateTime,
) -> Result<Option<RateDenial>, DbErr> {
    if event.date >= now {
        return Ok(Some(RateDenial::EventNotConcluded));
    }

    let participated = event_volunteer::Entity::find()
        .select_only()
        .filter(event_volunteer::Column::EventId.eq(event.id))
        .filter(event_volunteer::Column::VolunteerId.eq(user_id))
        .exists(conn)
        .await?;

    if !participated {
        return Ok(Some(RateDenial::NotAParticipant));
    }

    let already_rated = rating::Entity::find()
        .select_only()
        .filter(rating::Column::EventId.eq(event.id))
        .filter(rating::Column::UserId.eq(user_id))
        .exists(conn)
        .await?;

    if already_rated {
        return Ok(Some(RateDenial::AlreadyRated));
    }

    Ok(None)
}

/// Whether the volunteer may rate the event right now.
pub(crate) async fn can_rate_event<C: ConnectionTrait + Send>(
    conn: &C,
    user_id: i64,
    event: &event::Model,
    now: PrimitiveDateTime,
) -> Result<bool, DbErr> {
    Ok(rate_denial(conn, user_id, event, now).await?.is_none())
}

#[cfg(test)]
mod tests {
    use crate::testing::{create_association_account, create_database, create_event, create_volunteer};

    use db::{
        event, event_volunteer, rating, ActiveValue, EntityTrait, OffsetDateTime,
    };
    use time::Duration;

    use super::{can_join, can_rate_event, rate_denial, unrated_events, JoinDenial, RateDenial};

    async fn find_event(db: &db::DatabaseConnection, event_id: i64) -> event::Model {
        event::Entity::find_by_id(event_id)
            .one(db)
            .await
            .unwrap()
            .unwrap()
    }

    async fn join(db: &db::DatabaseConnection, event_id: i64, user_id: i64) {
        event_volunteer::Entity::insert(event_volunteer::ActiveModel {
            event_id: ActiveValue::Set(event_id),
            volunteer_id: ActiveValue::Set(user_id),
            joined_at: ActiveValue::Set(db::naive_utc(OffsetDateTime::now_utc())),
        })
        .exec_without_returning(db)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn join_denials() {
        let db = create_database().await;

        let (_, association_id, _) =
            create_association_account(&db, "org@example.com", "G12345678").await;
        let event_id = create_event(
            &db,
            association_id,
            OffsetDateTime::now_utc() + Duration::days(1),
            Some(1),
        )
        .await;

        let (first, _) = create_volunteer(&db, "first@example.com").await;
        let (second, _) = create_volunteer(&db, "second@example.com").await;

        let event = find_event(&db, event_id).await;

        assert_eq!(can_join(&db, &event, first).await.unwrap(), Ok(()));

        join(&db, event_id, first).await;

        assert_eq!(
            can_join(&db, &event, first).await.unwrap(),
            Err(JoinDenial::AlreadyJoined)
        );
        assert_eq!(
            can_join(&db, &event, second).await.unwrap(),
            Err(JoinDenial::EventFull)
        );
    }

    #[tokio::test]
    async fn rating_lifecycle() {
        let db = create_database().await;

        let (_, association_id, _) =
            create_association_account(&db, "org@example.com", "G12345678").await;
        let event_id = create_event(
            &db,
            association_id,
            OffsetDateTime::now_utc() + Duration::hours(1),
            None,
        )
        .await;

        let (user_id, _) = create_volunteer(&db, "ana@example.com").await;
        let event = find_event(&db, event_id).await;

        let now = db::naive_utc(OffsetDateTime::now_utc());

        // Not concluded yet.
        assert_eq!(
            rate_denial(&db, user_id, &event, now).await.unwrap(),
            Some(RateDenial::EventNotConcluded)
        );

        // Concluded, but the user never participated.
        let after = now + Duration::hours(2);
        assert_eq!(
            rate_denial(&db, user_id, &event, after).await.unwrap(),
            Some(RateDenial::NotAParticipant)
        );

        join(&db, event_id, user_id).await;
        assert!(can_rate_event(&db, user_id, &event, after).await.unwrap());

        let unrated = unrated_events(&db, user_id, association_id, after)
            .await
            .unwrap();
        assert_eq!(unrated.len(), 1);
        assert_eq!(unrated[0].id, event_id);

        rating::Entity::insert(rating::ActiveModel {
            rating: ActiveValue::Set(5),
            user_id: ActiveValue::Set(user_id),
            association_id: ActiveValue::Set(association_id),
            event_id: ActiveValue::Set(event_id),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .exec_without_returning(&db)
        .await
        .unwrap();

        assert_eq!(
            rate_denial(&db, user_id, &event, after).await.unwrap(),
            Some(RateDenial::AlreadyRated)
        );
        assert!(unrated_events(&db, user_id, association_id, after)
            .await
            .unwrap()
            .is_empty());
    }
}
