use worker::*;

#[path = "wasm/brevo.rs"]
pub mod brevo;
#[path = "wasm/db/mod.rs"]
pub mod db;
#[path = "wasm/env.rs"]
pub mod env;
#[path = "wasm/handlers/mod.rs"]
pub mod handlers;
#[path = "wasm/http.rs"]
pub mod http;

use std::sync::OnceLock;

use crate::ratelimit::FixedWindowLimiter;
use crate::util::{now_ts, ts_to_rfc3339};

use http::{json_with_cors, not_found};

/// Per-isolate rate-limiter ledger. Workers keep isolates warm across
/// requests, so the window state survives between invocations of `fetch`.
fn rate_limiter() -> &'static FixedWindowLimiter {
    static LIMITER: OnceLock<FixedWindowLimiter> = OnceLock::new();
    LIMITER.get_or_init(FixedWindowLimiter::new)
}

#[event(fetch)]
pub async fn fetch(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    console_error_panic_hook::set_once();

    if req.method() == Method::Options {
        let resp = Response::empty()?.with_status(204);
        return json_with_cors(&req, resp);
    }

    // Opportunistically drop ended rate-limit windows.
    rate_limiter().sweep(now_ts());

    let url = req.url()?;
    let path = url.path();

    if req.method() == Method::Get && path == "/health" {
        let body = serde_json::json!({
            "ok": true,
            "service": "doorlist",
        });
        let resp = Response::from_json(&body)?;
        return json_with_cors(&req, resp);
    }
    if req.method() == Method::Get && path == "/api/now" {
        let resp = Response::from_json(&ts_to_rfc3339(now_ts()))?;
        return json_with_cors(&req, resp);
    }

    // Event creation must be routed before the "/api/events/<id>" prefix
    // handler.
    if req.method() == Method::Post && path == "/api/events" {
        return handlers::events::handle_create_event(req, &env).await;
    }

    if let Some(rest) = path.strip_prefix("/api/events/") {
        let (event_id, tail) = rest.split_once('/').unwrap_or((rest, ""));
        let event_id = event_id.to_string();

        if req.method() == Method::Get && tail.is_empty() {
            return handlers::events::handle_event(req, &env, event_id).await;
        }
        if req.method() == Method::Post && tail == "gate" {
            return handlers::gate::handle_gate(req, &env, event_id).await;
        }
        if req.method() == Method::Post && tail == "rsvp" {
            return handlers::rsvp::handle_submit(req, &env, rate_limiter(), event_id).await;
        }
        if req.method() == Method::Post && tail == "rsvp/confirm" {
            return handlers::rsvp::handle_confirm(req, &env, rate_limiter(), event_id).await;
        }
        if req.method() == Method::Put && tail == "passcode" {
            return handlers::events::handle_rotate_passcode(req, &env, event_id).await;
        }
        if req.method() == Method::Get && tail == "rsvps" {
            return handlers::events::handle_event_rsvps(req, &env, event_id).await;
        }
    }

    if let Some(rest) = path.strip_prefix("/api/verify/") {
        if req.method() == Method::Get {
            let token = rest.trim_matches('/').to_string();
            return handlers::verify::handle_verify(req, &env, token).await;
        }
    }

    if req.method() == Method::Post && path == "/api/admin/login" {
        return handlers::admin::handle_login(req, &env, rate_limiter()).await;
    }

    if req.method() == Method::Post && path == "/v1/admin/migrations/up" {
        return handlers::migrations::handle_migrations_up(&req, &env).await;
    }
    if req.method() == Method::Get && path == "/v1/admin/db/ping" {
        return handlers::admin::handle_db_ping(&req, &env).await;
    }

    not_found(&req)
}
