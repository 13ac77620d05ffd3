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
                    .table(GuestSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GuestSessions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GuestSessions::Admin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GuestSessions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GuestSessions::ExpiresAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Passcode grants (per-session, per-event).
        manager
            .create_table(
                Table::create()
                    .table(SessionGrants::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SessionGrants::SessionId).string().not_null())
                    .col(ColumnDef::new(SessionGrants::EventId).string().not_null())
                    .col(
                        ColumnDef::new(SessionGrants::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_session_grants_session_event")
                            .col(SessionGrants::SessionId)
                            .col(SessionGrants::EventId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_grants_session_id")
                            .from(SessionGrants::Table, SessionGrants::SessionId)
                            .to(GuestSessions::Table, GuestSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Staged soft-duplicate submissions (at most one per session+event).
        manager
            .create_table(
                Table::create()
                    .table(PendingRsvps::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PendingRsvps::SessionId).string().not_null())
                    .col(ColumnDef::new(PendingRsvps::EventId).string().not_null())
                    .col(ColumnDef::new(PendingRsvps::Name).string().not_null())
                    .col(ColumnDef::new(PendingRsvps::Email).string().not_null())
                    .col(ColumnDef::new(PendingRsvps::Phone).string())
                    .col(ColumnDef::new(PendingRsvps::Note).text())
                    .col(
                        ColumnDef::new(PendingRsvps::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_pending_rsvps_session_event")
                            .col(PendingRsvps::SessionId)
                            .col(PendingRsvps::EventId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pending_rsvps_session_id")
                            .from(PendingRsvps::Table, PendingRsvps::SessionId)
                            .to(GuestSessions::Table, GuestSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let _ = manager
            .drop_table(Table::drop().table(PendingRsvps::Table).to_owned())
            .await;
        let _ = manager
            .drop_table(Table::drop().table(SessionGrants::Table).to_owned())
            .await;

        manager
            .drop_table(Table::drop().table(GuestSessions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GuestSessions {
    Table,
    Id,
    Admin,
    CreatedAt,
    ExpiresAt,
}

#[derive(DeriveIden)]
enum SessionGrants {
    Table,
    SessionId,
    EventId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PendingRsvps {
    Table,
    SessionId,
    EventId,
    Name,
    Email,
    Phone,
    Note,
    CreatedAt,
}
