use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A guest registration against one event.
///
/// Within one event at most one RSVP may carry a given name under
/// case-insensitive, whitespace-trimmed equality; the intake path enforces
/// this as a hard rejection. Email and phone collisions are permitted after
/// an explicit guest confirmation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "rsvps")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: String,

    pub event_id: String,

    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub note: Option<String>,

    /// Flips false -> true exactly once, on first token resolution.
    pub verified: bool,

    /// Opaque email verification token (hex). Kept after resolution so
    /// repeat visits to the verification link stay idempotent.
    #[sea_orm(unique)]
    pub verification_token: Option<String>,

    /// Last Brevo contact-sync failure, kept for operator visibility.
    pub list_sync_error: Option<String>,

    /// Unix timestamp (seconds).
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
