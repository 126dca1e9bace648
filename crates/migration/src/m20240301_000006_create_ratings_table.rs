use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ratings::Table)
                    .col(
                        ColumnDef::new(Ratings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Ratings::Rating).small_integer().not_null())
                    .col(ColumnDef::new(Ratings::Comment).text())
                    .col(ColumnDef::new(Ratings::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Ratings::AssociationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Ratings::EventId).big_integer().not_null())
                    .col(ColumnDef::new(Ratings::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Ratings::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Ratings::Table, Ratings::UserId)
                            .to(crate::Users::Table, crate::Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Ratings::Table, Ratings::AssociationId)
                            .to(crate::Associations::Table, crate::Associations::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Ratings::Table, Ratings::EventId)
                            .to(crate::Events::Table, crate::Events::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One rating per (user, event) pair.
        manager
            .create_index(
                Index::create()
                    .name("idx_ratings_user_event")
                    .table(Ratings::Table)
                    .col(Ratings::UserId)
                    .col(Ratings::EventId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ratings::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
enum Ratings {
    Table,
    Id,
    Rating,
    Comment,
    UserId,
    AssociationId,
    EventId,
    CreatedAt,
    UpdatedAt,
}
