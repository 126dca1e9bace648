use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Associations::Table)
                    .col(
                        ColumnDef::new(Associations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Associations::Name).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Associations::Cif)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Associations::Description)
                            .string_len(1000)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Associations::ContactEmail)
                            .string_len(120)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Associations::ImageUrl).string_len(500))
                    .col(ColumnDef::new(Associations::WebsiteUrl).string_len(500))
                    .col(ColumnDef::new(Associations::SocialMediaUrl).string_len(500))
                    .col(ColumnDef::new(Associations::ContactPhone).string_len(20))
                    .col(
                        ColumnDef::new(Associations::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Associations::Table, Associations::UserId)
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
            .drop_table(Table::drop().table(Associations::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
pub(crate) enum Associations {
    Table,
    Id,
    Name,
    Cif,
    Description,
    ContactEmail,
    ImageUrl,
    WebsiteUrl,
    SocialMediaUrl,
    ContactPhone,
    UserId,
}
