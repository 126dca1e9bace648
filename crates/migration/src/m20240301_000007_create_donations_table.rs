use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Donations::Table)
                    .col(
                        ColumnDef::new(Donations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Donations::Amount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Donations::Currency)
                            .string_len(3)
                            .not_null()
                            .default("EUR"),
                    )
                    .col(ColumnDef::new(Donations::Description).text())
                    .col(ColumnDef::new(Donations::DonorId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Donations::AssociationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Donations::EventId).big_integer())
                    .col(ColumnDef::new(Donations::CheckoutSessionId).string_len(255))
                    .col(
                        ColumnDef::new(Donations::Status)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Donations::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Donations::CompletedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Donations::Table, Donations::DonorId)
                            .to(crate::Users::Table, crate::Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Donations::Table, Donations::AssociationId)
                            .to(crate::Associations::Table, crate::Associations::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Donations::Table, Donations::EventId)
                            .to(crate::Events::Table, crate::Events::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Completion lookups come from the payment processor callback,
        // keyed by the stored session identifier.
        manager
            .create_index(
                Index::create()
                    .name("idx_donations_checkout_session")
                    .table(Donations::Table)
                    .col(Donations::CheckoutSessionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Donations::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
enum Donations {
    Table,
    Id,
    Amount,
    Currency,
    Description,
    DonorId,
    AssociationId,
    EventId,
    CheckoutSessionId,
    Status,
    CreatedAt,
    CompletedAt,
}
