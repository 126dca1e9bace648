use std::error::Error;
use std::sync::Arc;

use axum::async_trait;
use common::{
    config::Config,
    mail::NoopMailer,
    payments::MockCheckout,
};
use db::{
    association, event, token, user, ActiveModelTrait, ActiveValue, Database, DatabaseConnection,
    OffsetDateTime,
};
use hyper::body::{self, Bytes, HttpBody};
use migration::MigratorTrait;
use serde::Serialize;

use crate::{clock::SystemClock, passwords, state::AppState};

pub(crate) async fn create_database() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("unable to create test database");

    migration::Migrator::up(&db, None)
        .await
        .expect("unable to run migrations");

    db
}

/// App state wired with deterministic collaborators.
pub(crate) fn test_state(db: DatabaseConnection) -> AppState {
    AppState {
        db: Arc::new(db),
        config: Arc::new(Config::for_tests()),
        clock: Arc::new(SystemClock),
        checkout: Arc::new(MockCheckout::default()),
        mailer: Arc::new(NoopMailer),
    }
}

/// Insert an active volunteer account along with an authentication token.
pub(crate) async fn create_volunteer(db: &DatabaseConnection, email: &str) -> (i64, String) {
    let user = user::ActiveModel {
        email: ActiveValue::Set(email.to_owned()),
        password: ActiveValue::Set(
            passwords::hash("volunteer-password").expect("unable to hash password"),
        ),
        is_active: ActiveValue::Set(true),
        created_at: ActiveValue::Set(db::naive_utc(OffsetDateTime::now_utc())),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("unable to insert test user");

    let (token_model, token) = token::generate_token(user.id);

    token_model
        .insert(db)
        .await
        .expect("unable to insert test token");

    (user.id, token)
}

/// Insert an association-owning account with its association and token.
pub(crate) async fn create_association_account(
    db: &DatabaseConnection,
    email: &str,
    cif: &str,
) -> (i64, i64, String) {
    let (user_id, token) = create_volunteer(db, email).await;

    let association = association::ActiveModel {
        name: ActiveValue::Set(format!("Association {cif}")),
        cif: ActiveValue::Set(cif.to_owned()),
        description: ActiveValue::Set(String::from("Test association")),
        contact_email: ActiveValue::Set(email.to_owned()),
        user_id: ActiveValue::Set(user_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("unable to insert test association");

    (user_id, association.id, token)
}

/// Insert an event owned by an association.
pub(crate) async fn create_event(
    db: &DatabaseConnection,
    association_id: i64,
    date: OffsetDateTime,
    max_volunteers: Option<i32>,
) -> i64 {
    let event = event::ActiveModel {
        title: ActiveValue::Set(String::from("Beach cleanup")),
        date: ActiveValue::Set(db::naive_utc(date)),
        city: ActiveValue::Set(String::from("Valencia")),
        max_volunteers: ActiveValue::Set(max_volunteers),
        is_active: ActiveValue::Set(true),
        association_id: ActiveValue::Set(association_id),
        created_at: ActiveValue::Set(db::naive_utc(OffsetDateTime::now_utc())),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("unable to insert test event");

    event.id
}

pub(crate) trait RequestBodyExt: Sized {
    fn from_json<B: Serialize>(val: B) -> Self;
}

impl<T> RequestBodyExt for T
where
    T: HttpBody + From<Vec<u8>>,
{
    fn from_json<B: Serialize>(val: B) -> Self {
        T::from(serde_json::to_vec(&val).expect("unable to serialize"))
    }
}

#[async_trait(?Send)]
pub(crate) trait ResponseBodyExt {
    async fn bytes(self) -> Bytes;

    async fn json(self) -> serde_json::Value;
}

#[async_trait(?Send)]
impl<T> ResponseBodyExt for T
where
    T: HttpBody,
    T::Error: Error,
{
    async fn bytes(self) -> Bytes {
        body::to_bytes(self)
            .await
            .expect("unable to convert to bytes")
    }

    async fn json(self) -> serde_json::Value {
        serde_json::from_slice(&self.bytes().await).expect("unable to convert to json")
    }
}
