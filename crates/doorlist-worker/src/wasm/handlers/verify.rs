use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use worker::{Env, Request, Response, Result};

use crate::worker_wasm::db::db_connect;
use crate::worker_wasm::http::{db_error_response, error_response, json_with_cors};

use entity::rsvp;

/// Resolve an emailed verification token.
///
/// Unknown, malformed and already-consumed tokens are indistinguishable on
/// the wire. Resolution is idempotent: the verified flag flips at most
/// once, and repeat visits report `newlyVerified: false`.
pub async fn handle_verify(req: Request, env: &Env, token: String) -> Result<Response> {
    let token = token.trim().to_string();
    if token.is_empty() {
        return error_response(&req, 404, "not_found", "Invalid or expired verification link");
    }

    let db = match db_connect(env).await {
        Ok(db) => db,
        Err(e) => return db_error_response(&req, "Failed to open database connection", &e),
    };

    let found = match rsvp::Entity::find()
        .filter(rsvp::Column::VerificationToken.eq(&token))
        .one(&db)
        .await
    {
        Ok(found) => found,
        Err(e) => return db_error_response(&req, "Failed to resolve verification token", &e),
    };
    let Some(record) = found else {
        return error_response(&req, 404, "not_found", "Invalid or expired verification link");
    };

    let newly_verified = !record.verified;
    if newly_verified {
        let mut active: rsvp::ActiveModel = record.clone().into();
        active.verified = Set(true);
        if let Err(e) = active.update(&db).await {
            worker::console_log!("Failed to mark rsvp {} verified: {e}", record.id);
            return error_response(&req, 500, "save_failed", "Could not record verification");
        }
    }

    let resp = Response::from_json(&serde_json::json!({
        "verified": true,
        "newlyVerified": newly_verified,
        "eventId": record.event_id,
    }))?;
    json_with_cors(&req, resp)
}
