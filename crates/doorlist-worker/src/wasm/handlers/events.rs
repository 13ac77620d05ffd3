use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use serde_json::Value;
use worker::{Env, Request, Response, Result};

use crate::crypto;
use crate::util::{generate_record_id, now_ts, random_bytes, ts_to_rfc3339};
use crate::worker_wasm::db::db_connect;
use crate::worker_wasm::http::{
    db_error_response, error_response, json_with_cors, not_found,
};

use super::session::{self, AdminAccess};

use entity::{event, rsvp};

/// Explicit wire mapping for an event record. Secrets never leave the row.
pub fn event_json(e: &event::Model) -> Value {
    serde_json::json!({
        "id": e.id,
        "title": e.title,
        "description": e.description,
        "date": e.date,
        "time": e.time,
        "location": e.location,
        "capacity": e.capacity,
        "price": e.price,
        "organizer": e.organizer,
        "tags": e.tags,
        "imageUrl": e.image_url,
        "registered": e.registered,
        "passcodeProtected": e.passcode_hash.is_some(),
        "brevoListId": e.brevo_list_id,
        "createdAt": ts_to_rfc3339(e.created_at),
        "updatedAt": ts_to_rfc3339(e.updated_at),
    })
}

fn rsvp_json(r: &rsvp::Model) -> Value {
    serde_json::json!({
        "id": r.id,
        "eventId": r.event_id,
        "name": r.name,
        "email": r.email,
        "phone": r.phone,
        "note": r.note,
        "verified": r.verified,
        "listSyncError": r.list_sync_error,
        "createdAt": ts_to_rfc3339(r.created_at),
    })
}

/// Guest view of one event. Passcode-gated events require a grant; the
/// un-granted response points the client back at the gate.
pub async fn handle_event(req: Request, env: &Env, event_id: String) -> Result<Response> {
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

    if evt.passcode_hash.is_some() {
        let granted = match session::load(&req, &db).await? {
            Some(s) => session::has_grant(&db, &s.id, &evt.id).await?,
            None => false,
        };
        if !granted {
            return error_response(
                &req,
                401,
                "passcode_required",
                "This event requires a passcode",
            );
        }
    }

    let resp = Response::from_json(&event_json(&evt))?;
    json_with_cors(&req, resp)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventData {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    capacity: Option<i32>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    organizer: Option<String>,
    #[serde(default)]
    tags: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    passcode: Option<String>,
    #[serde(default)]
    brevo_list_id: Option<i64>,
}

fn hashed_passcode(passcode: Option<&str>) -> (Option<Vec<u8>>, Option<Vec<u8>>, i32) {
    match passcode.map(str::trim).filter(|p| !p.is_empty()) {
        Some(code) => {
            let salt = random_bytes(64);
            let hash = crypto::hash_passcode(code.as_bytes(), &salt, crypto::PASSCODE_ITERATIONS);
            (Some(hash), Some(salt), crypto::PASSCODE_ITERATIONS as i32)
        }
        None => (None, None, 0),
    }
}

/// Organizer action: create an event. Admin session required.
pub async fn handle_create_event(mut req: Request, env: &Env) -> Result<Response> {
    let db = match db_connect(env).await {
        Ok(db) => db,
        Err(e) => return db_error_response(&req, "Failed to open database connection", &e),
    };

    if let AdminAccess::Denied(resp) = session::require_admin(&req, &db).await? {
        return Ok(resp);
    }

    let payload: EventData = match req.json().await {
        Ok(p) => p,
        Err(e) => {
            worker::console_log!("Invalid event payload: {e}");
            return error_response(&req, 400, "invalid_json", "Invalid JSON body");
        }
    };

    let title = payload.title.trim();
    if title.is_empty() {
        return error_response(&req, 400, "required_fields", "Title is required");
    }

    let now = now_ts();
    let (hash, salt, iterations) = hashed_passcode(payload.passcode.as_deref());

    let active = event::ActiveModel {
        id: Set(generate_record_id()),
        title: Set(title.to_string()),
        description: Set(payload.description),
        date: Set(payload.date),
        time: Set(payload.time),
        location: Set(payload.location),
        capacity: Set(payload.capacity),
        price: Set(payload.price),
        organizer: Set(payload.organizer),
        tags: Set(payload.tags),
        image_url: Set(payload.image_url),
        passcode_hash: Set(hash),
        passcode_salt: Set(salt),
        passcode_iterations: Set(iterations),
        registered: Set(0),
        brevo_list_id: Set(payload.brevo_list_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let created = match active.insert(&db).await {
        Ok(created) => created,
        Err(e) => {
            worker::console_log!("Failed to save event: {e}");
            return error_response(&req, 500, "save_failed", "Could not save event");
        }
    };

    let resp = Response::from_json(&event_json(&created))?.with_status(201);
    json_with_cors(&req, resp)
}

#[derive(Debug, Deserialize)]
struct PasscodeData {
    #[serde(default)]
    passcode: Option<String>,
}

/// Organizer action: rotate (or clear) an event's passcode.
pub async fn handle_rotate_passcode(mut req: Request, env: &Env, event_id: String) -> Result<Response> {
    let db = match db_connect(env).await {
        Ok(db) => db,
        Err(e) => return db_error_response(&req, "Failed to open database connection", &e),
    };

    if let AdminAccess::Denied(resp) = session::require_admin(&req, &db).await? {
        return Ok(resp);
    }

    let found = match event::Entity::find_by_id(event_id).one(&db).await {
        Ok(found) => found,
        Err(e) => return db_error_response(&req, "Failed to load event", &e),
    };
    let Some(evt) = found else {
        return not_found(&req);
    };

    let payload: PasscodeData = match req.json().await {
        Ok(p) => p,
        Err(_) => PasscodeData { passcode: None },
    };

    let (hash, salt, iterations) = hashed_passcode(payload.passcode.as_deref());
    let protected = hash.is_some();

    let mut active: event::ActiveModel = evt.into();
    active.passcode_hash = Set(hash);
    active.passcode_salt = Set(salt);
    active.passcode_iterations = Set(iterations);
    active.updated_at = Set(now_ts());

    if let Err(e) = active.update(&db).await {
        worker::console_log!("Failed to rotate passcode: {e}");
        return error_response(&req, 500, "save_failed", "Could not save event");
    }

    let resp = Response::from_json(&serde_json::json!({
        "success": true,
        "passcodeProtected": protected,
    }))?;
    json_with_cors(&req, resp)
}

/// Organizer view of an event's guest list, including verification state
/// and contact-sync failures.
pub async fn handle_event_rsvps(req: Request, env: &Env, event_id: String) -> Result<Response> {
    let db = match db_connect(env).await {
        Ok(db) => db,
        Err(e) => return db_error_response(&req, "Failed to open database connection", &e),
    };

    if let AdminAccess::Denied(resp) = session::require_admin(&req, &db).await? {
        return Ok(resp);
    }

    let found = match event::Entity::find_by_id(event_id).one(&db).await {
        Ok(found) => found,
        Err(e) => return db_error_response(&req, "Failed to load event", &e),
    };
    let Some(evt) = found else {
        return not_found(&req);
    };

    let rsvps = match rsvp::Entity::find()
        .filter(rsvp::Column::EventId.eq(&evt.id))
        .order_by_asc(rsvp::Column::CreatedAt)
        .all(&db)
        .await
    {
        Ok(rows) => rows,
        Err(e) => return db_error_response(&req, "Failed to load RSVPs", &e),
    };

    let data: Vec<Value> = rsvps.iter().map(rsvp_json).collect();
    let resp = Response::from_json(&serde_json::json!({
        "eventId": evt.id,
        "registered": evt.registered,
        "data": data,
    }))?;
    json_with_cors(&req, resp)
}
