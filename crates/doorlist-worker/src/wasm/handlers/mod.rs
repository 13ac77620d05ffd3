pub mod admin;
pub mod events;
pub mod gate;
pub mod migrations;
pub mod ops_auth;
pub mod rsvp;
pub mod session;
pub mod verify;
