use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventVolunteers::Table)
                    .col(
                        ColumnDef::new(EventVolunteers::EventId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EventVolunteers::VolunteerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EventVolunteers::JoinedAt)
                            .timestamp()
                            .not_null(),
                    )
                    // Composite key rules out duplicate (event, volunteer) pairs
                    // without relying on an application-side existence check.
                    .primary_key(
                        Index::create()
                            .col(EventVolunteers::EventId)
                            .col(EventVolunteers::VolunteerId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EventVolunteers::Table, EventVolunteers::EventId)
                            .to(crate::Events::Table, crate::Events::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EventVolunteers::Table, EventVolunteers::VolunteerId)
                            .to(crate::Users::Table, crate::Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventVolunteers::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
enum EventVolunteers {
    Table,
    EventId,
    VolunteerId,
    JoinedAt,
}
