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
                    .table(Rsvps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rsvps::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rsvps::EventId).string().not_null())
                    .col(ColumnDef::new(Rsvps::Name).string().not_null())
                    .col(ColumnDef::new(Rsvps::Email).string().not_null())
                    .col(ColumnDef::new(Rsvps::Phone).string())
                    .col(ColumnDef::new(Rsvps::Note).text())
                    .col(
                        ColumnDef::new(Rsvps::Verified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Rsvps::VerificationToken).string())
                    .col(ColumnDef::new(Rsvps::ListSyncError).string())
                    .col(ColumnDef::new(Rsvps::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rsvps_event_id")
                            .from(Rsvps::Table, Rsvps::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rsvps_event_id")
                    .table(Rsvps::Table)
                    .col(Rsvps::EventId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rsvps_verification_token")
                    .table(Rsvps::Table)
                    .col(Rsvps::VerificationToken)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let _ = manager
            .drop_index(
                Index::drop()
                    .name("idx_rsvps_verification_token")
                    .to_owned(),
            )
            .await;
        let _ = manager
            .drop_index(Index::drop().name("idx_rsvps_event_id").to_owned())
            .await;

        manager
            .drop_table(Table::drop().table(Rsvps::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Rsvps {
    Table,
    Id,
    EventId,
    Name,
    Email,
    Phone,
    Note,
    Verified,
    VerificationToken,
    ListSyncError,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
}
