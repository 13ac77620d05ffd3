pub use sea_orm_migration::prelude::*;

mod m20260801_000001_events;
mod m20260801_000002_rsvps;
mod m20260801_000003_guest_sessions;

pub struct Migrator;

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_events::Migration),
            Box::new(m20260801_000002_rsvps::Migration),
            Box::new(m20260801_000003_guest_sessions::Migration),
        ]
    }
}
