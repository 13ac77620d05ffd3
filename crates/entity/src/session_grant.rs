use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-session passcode grants: the set of event ids a session has passed
/// the gate for.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "session_grants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: String,

    #[sea_orm(primary_key, auto_increment = false)]
    pub event_id: String,

    /// Unix timestamp (seconds).
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
