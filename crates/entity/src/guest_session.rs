use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Guest browser session, keyed by the opaque cookie token.
///
/// The Worker is stateless across invocations, so session state lives here
/// instead of in process memory. Passcode grants and staged RSVPs hang off
/// this row via `session_grants` and `pending_rsvps`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "guest_sessions")]
pub struct Model {
    /// 256-bit random token, hex-encoded. Doubles as the cookie value.
    #[sea_orm(primary_key)]
    pub id: String,

    /// Process-wide admin access, granted by the admin-code login.
    pub admin: bool,

    /// Unix timestamp (seconds).
    pub created_at: i64,

    /// Unix timestamp (seconds). Expired rows are treated as absent.
    pub expires_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
