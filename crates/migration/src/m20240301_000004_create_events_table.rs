use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .col(
                        ColumnDef::new(Events::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Events::Description).text())
                    .col(ColumnDef::new(Events::ImageUrl).string_len(500))
                    .col(ColumnDef::new(Events::Date).timestamp().not_null())
                    .col(ColumnDef::new(Events::City).string_len(100).not_null())
                    .col(ColumnDef::new(Events::Address).string_len(255))
                    .col(ColumnDef::new(Events::Category).string_len(100))
                    .col(ColumnDef::new(Events::MaxVolunteers).integer())
                    .col(
                        ColumnDef::new(Events::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Events::AssociationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Events::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Events::Table, Events::AssociationId)
                            .to(crate::Associations::Table, crate::Associations::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
pub(crate) enum Events {
    Table,
    Id,
    Title,
    Description,
    ImageUrl,
    Date,
    City,
    Address,
    Category,
    MaxVolunteers,
    IsActive,
    AssociationId,
    CreatedAt,
}
