pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_users_table;
mod m20240301_000002_create_associations_table;
mod m20240301_000003_create_authentication_tokens_table;
mod m20240301_000004_create_events_table;
mod m20240301_000005_create_event_volunteers_table;
mod m20240301_000006_create_ratings_table;
mod m20240301_000007_create_donations_table;

pub(crate) use m20240301_000001_create_users_table::Users;
pub(crate) use m20240301_000002_create_associations_table::Associations;
pub(crate) use m20240301_000004_create_events_table::Events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_users_table::Migration),
            Box::new(m20240301_000002_create_associations_table::Migration),
            Box::new(m20240301_000003_create_authentication_tokens_table::Migration),
            Box::new(m20240301_000004_create_events_table::Migration),
            Box::new(m20240301_000005_create_event_volunteers_table::Migration),
            Box::new(m20240301_000006_create_ratings_table::Migration),
            Box::new(m20240301_000007_create_donations_table::Migration),
        ]
    }
}
