use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A soft-duplicate submission staged for explicit guest confirmation.
///
/// At most one per (session, event); a new soft-duplicate submission
/// overwrites it, a confirm or a clean persist deletes it. Staged rows have
/// no expiry of their own; they are bounded by the owning session's
/// lifetime.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pending_rsvps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: String,

    #[sea_orm(primary_key, auto_increment = false)]
    pub event_id: String,

    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub note: Option<String>,

    /// Unix timestamp (seconds).
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
