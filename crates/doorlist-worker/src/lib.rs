//! doorlist: event RSVP service for Cloudflare Workers.
//!
//! The HTTP surface (router, handlers, DB connection, outbound email) is
//! wasm32-only. The RSVP domain core below is target-neutral so it can be
//! checked and unit-tested on typical dev machines without a Workers
//! toolchain.

pub mod crypto;
pub mod dedup;
pub mod intake;
pub mod ratelimit;
pub mod util;
pub mod validate;

#[cfg(target_arch = "wasm32")]
mod worker_wasm;

#[cfg(target_arch = "wasm32")]
pub use worker_wasm::*;
