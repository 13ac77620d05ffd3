use sea_orm::EntityTrait;
use serde::Deserialize;
use worker::{Env, Request, Response, Result};

use crate::crypto;
use crate::worker_wasm::db::db_connect;
use crate::worker_wasm::env::session_ttl_secs;
use crate::worker_wasm::http::{
    db_error_response, error_response, json_with_cors, not_found, set_session_cookie,
};

use super::session;

use entity::event;

#[derive(Debug, Deserialize)]
struct GateData {
    #[serde(default)]
    passcode: Option<String>,
}

/// Passcode gate: grants this session access to one event's RSVP form.
///
/// Public events (no stored hash) always grant. A session that already
/// holds a grant short-circuits without re-checking the secret.
pub async fn handle_gate(mut req: Request, env: &Env, event_id: String) -> Result<Response> {
    let db = match db_connect(env).await {
        Ok(db) => db,
        Err(e) => return db_error_response(&req, "Failed to open database connection", &e),
    };

    let found = match event::Entity::find_by_id(event_id).one(&db).await {
        Ok(found) => found,
        Err(e) => return db_error_response(&req, "Failed to load event", &e),
    };
    let Some(evt) = found else {
        return not_found(&req);
    };

    let ttl = session_ttl_secs(env);
    let ctx = session::load_or_create(&req, &db, ttl).await?;

    let already_granted = session::has_grant(&db, &ctx.session.id, &evt.id).await?;
    if !already_granted {
        if let (Some(hash), Some(salt)) = (&evt.passcode_hash, &evt.passcode_salt) {
            // Missing or malformed bodies fall through to an empty secret,
            // which fails verification the same way a wrong one does.
            let supplied = match req.json::<GateData>().await {
                Ok(p) => p.passcode.unwrap_or_default(),
                Err(_) => String::new(),
            };

            if !crypto::verify_passcode(
                supplied.as_bytes(),
                salt,
                hash,
                evt.passcode_iterations as u32,
            ) {
                return error_response(&req, 401, "invalid_passcode", "Invalid passcode");
            }
        }

        session::insert_grant(&db, &ctx.session.id, &evt.id).await?;
    }

    let mut resp = Response::from_json(&serde_json::json!({
        "granted": true,
        "eventId": evt.id,
    }))?;
    if ctx.fresh {
        set_session_cookie(&mut resp, &ctx.session.id, ttl)?;
    }

    json_with_cors(&req, resp)
}
