use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::Title).string().not_null())
                    .col(ColumnDef::new(Events::Description).text())
                    .col(ColumnDef::new(Events::Date).string())
                    .col(ColumnDef::new(Events::Time).string())
                    .col(ColumnDef::new(Events::Location).string())
                    .col(ColumnDef::new(Events::Capacity).integer())
                    .col(ColumnDef::new(Events::Price).string())
                    .col(ColumnDef::new(Events::Organizer).string())
                    .col(ColumnDef::new(Events::Tags).string())
                    .col(ColumnDef::new(Events::ImageUrl).string())
                    .col(ColumnDef::new(Events::PasscodeHash).binary())
                    .col(ColumnDef::new(Events::PasscodeSalt).binary())
                    .col(
                        ColumnDef::new(Events::PasscodeIterations)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Events::Registered)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Events::BrevoListId).big_integer())
                    .col(ColumnDef::new(Events::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Events::UpdatedAt).big_integer().not_null())
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

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Title,
    Description,
    Date,
    Time,
    Location,
    Capacity,
    Price,
    Organizer,
    Tags,
    ImageUrl,
    PasscodeHash,
    PasscodeSalt,
    PasscodeIterations,
    Registered,
    BrevoListId,
    CreatedAt,
    UpdatedAt,
}
