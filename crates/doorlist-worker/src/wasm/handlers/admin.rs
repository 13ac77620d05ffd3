use sea_orm::{ActiveModelTrait, Set};
use serde::Deserialize;
use worker::{Env, Request, Response, Result};

use crate::crypto;
use crate::ratelimit::{
    Decision, FixedWindowLimiter, ADMIN_LOGIN_LIMIT, ADMIN_LOGIN_WINDOW_SECS,
};
use crate::util::now_ts;
use crate::worker_wasm::db::db_connect;
use crate::worker_wasm::env::{env_string, session_ttl_secs};
use crate::worker_wasm::http::{
    client_ip, db_error_response, error_response, json_with_cors, set_session_cookie,
};

use super::ops_auth::ensure_ops_authorized;
use super::session;

use entity::guest_session;

#[derive(Debug, Deserialize)]
struct LoginData {
    code: String,
}

/// Admin login: a process-wide shared code, distinct from per-event
/// passcodes. Success marks the guest session as admin.
pub async fn handle_login(
    mut req: Request,
    env: &Env,
    limiter: &FixedWindowLimiter,
) -> Result<Response> {
    let key = format!("admin:{}", client_ip(&req));
    if limiter.check(&key, ADMIN_LOGIN_LIMIT, ADMIN_LOGIN_WINDOW_SECS, now_ts())
        == Decision::Limited
    {
        return error_response(&req, 429, "rate_limited", "Too many attempts; try again later");
    }

    let payload: LoginData = match req.json().await {
        Ok(p) => p,
        Err(e) => {
            worker::console_log!("Invalid admin login payload: {e}");
            return error_response(&req, 400, "invalid_json", "Invalid JSON body");
        }
    };

    // One generic denial for every failure shape: a missing ADMIN_CODE and
    // a wrong code are indistinguishable to the caller.
    let Some(expected) = env_string(env, "ADMIN_CODE") else {
        worker::console_log!("ADMIN_CODE is not configured");
        return error_response(&req, 401, "unauthorized", "Invalid code");
    };

    if !crypto::verify_shared_code(payload.code.trim(), &expected) {
        return error_response(&req, 401, "unauthorized", "Invalid code");
    }

    let db = match db_connect(env).await {
        Ok(db) => db,
        Err(e) => return db_error_response(&req, "Failed to open database connection", &e),
    };

    let ttl = session_ttl_secs(env);
    let ctx = session::load_or_create(&req, &db, ttl).await?;

    if !ctx.session.admin {
        let mut active: guest_session::ActiveModel = ctx.session.clone().into();
        active.admin = Set(true);
        if let Err(e) = active.update(&db).await {
            return db_error_response(&req, "Failed to mark session as admin", &e);
        }
    }

    let mut resp = Response::from_json(&serde_json::json!({ "admin": true }))?;
    if ctx.fresh {
        set_session_cookie(&mut resp, &ctx.session.id, ttl)?;
    }
    json_with_cors(&req, resp)
}

pub async fn handle_db_ping(req: &Request, env: &Env) -> Result<Response> {
    if let Some(resp) = ensure_ops_authorized(req, env)? {
        return Ok(resp);
    }

    let db = match db_connect(env).await {
        Ok(db) => db,
        Err(e) => return db_error_response(req, "Failed to open database connection", &e),
    };

    // A minimal query to validate the connection.
    if let Err(e) = db.ping().await {
        return db_error_response(req, "Database ping failed", &e);
    }

    let resp = Response::from_json(&serde_json::json!({
        "success": true,
        "db": { "ok": true }
    }))?;

    json_with_cors(req, resp)
}
