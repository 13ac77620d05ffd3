use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An organizer-created gathering with a guest-visible RSVP form.
///
/// Display attributes are opaque to the service: they are stored and echoed
/// back for rendering, never interpreted. The only columns the RSVP flow
/// mutates are `registered` and the passcode hash (on rotation).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: String,

    pub title: String,
    pub description: Option<String>,

    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub price: Option<String>,
    pub organizer: Option<String>,
    pub tags: Option<String>,
    pub image_url: Option<String>,

    /// PBKDF2 hash of the guest passcode. `None` means the event is public
    /// and the gate always grants.
    pub passcode_hash: Option<Vec<u8>>,
    pub passcode_salt: Option<Vec<u8>>,
    pub passcode_iterations: i32,

    /// Count of persisted RSVPs.
    pub registered: i32,

    /// Brevo contact list to sync confirmed guests into.
    pub brevo_list_id: Option<i64>,

    /// Unix timestamp (seconds).
    pub created_at: i64,

    /// Unix timestamp (seconds).
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
