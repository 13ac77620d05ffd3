pub mod event;
pub mod rsvp;
pub mod guest_session;
pub mod session_grant;
pub mod pending_rsvp;

pub use event::Entity as Event;
pub use rsvp::Entity as Rsvp;
pub use guest_session::Entity as GuestSession;
pub use session_grant::Entity as SessionGrant;
pub use pending_rsvp::Entity as PendingRsvp;
