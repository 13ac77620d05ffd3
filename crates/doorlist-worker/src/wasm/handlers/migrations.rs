use worker::{Env, Request, Response, Result};

use migration::MigratorTrait;

use crate::worker_wasm::db::db_connect;
use crate::worker_wasm::http::{db_error_response, internal_error_response, json_with_cors};

use super::ops_auth::ensure_ops_authorized;

pub async fn handle_migrations_up(req: &Request, env: &Env) -> Result<Response> {
    if let Some(resp) = ensure_ops_authorized(req, env)? {
        return Ok(resp);
    }

    let db = match db_connect(env).await {
        Ok(db) => db,
        Err(e) => return db_error_response(req, "Failed to open database connection", &e),
    };

    // Workers cap outgoing subrequests per invocation and remote SQL
    // executes each statement as one, so migrations are applied a step at a
    // time; callers repeat the request (or pass ?steps=N) until done.
    let steps: u32 = req
        .url()
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(k, _)| k == "steps")
                .and_then(|(_, v)| v.parse::<u32>().ok())
        })
        .filter(|n| *n > 0)
        .unwrap_or(1);

    let pending_before = match migration::Migrator::get_pending_migrations(&db).await {
        Ok(p) => p,
        Err(e) => return internal_error_response(req, "Failed to read pending migrations", &e),
    };

    let steps_to_apply = steps.min(pending_before.len().try_into().unwrap_or(u32::MAX));

    if steps_to_apply > 0 {
        if let Err(e) = migration::Migrator::up(&db, Some(steps_to_apply)).await {
            return internal_error_response(req, "Failed to apply migrations", &e);
        }
    }

    let pending_after = match migration::Migrator::get_pending_migrations(&db).await {
        Ok(p) => p,
        Err(e) => return internal_error_response(req, "Failed to read pending migrations", &e),
    };

    let resp = Response::from_json(&serde_json::json!({
        "success": true,
        "migrations": {
            "applied_now": pending_before.len().saturating_sub(pending_after.len()),
            "pending": pending_after.len(),
            "done": pending_after.is_empty(),
            "next": pending_after.first().map(|m| m.name()),
        }
    }))?;

    json_with_cors(req, resp)
}
