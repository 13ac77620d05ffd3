use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use worker::{Env, Request, Response, Result};

use crate::intake::{self, IntakeOutcome};
use crate::ratelimit::{Decision, FixedWindowLimiter, RSVP_LIMIT, RSVP_WINDOW_SECS};
use crate::util::{generate_record_id, generate_verification_token, now_ts};
use crate::validate::RsvpSubmission;
use crate::worker_wasm::brevo;
use crate::worker_wasm::db::db_connect;
use crate::worker_wasm::env::session_ttl_secs;
use crate::worker_wasm::http::{
    client_ip, db_error_response, error_response, json_with_cors, not_found, set_session_cookie,
};

use super::session::{self, SessionContext};

use entity::{event, pending_rsvp, rsvp};

fn rate_limited(req: &Request, limiter: &FixedWindowLimiter) -> bool {
    let key = format!("rsvp:{}", client_ip(req));
    limiter.check(&key, RSVP_LIMIT, RSVP_WINDOW_SECS, now_ts()) == Decision::Limited
}

/// Insert the RSVP with a fresh verification token and bump the event's
/// `registered` counter in one atomic column expression. Runs inside the
/// caller's transaction.
async fn persist_rsvp<C: ConnectionTrait>(
    conn: &C,
    evt: &event::Model,
    name: &str,
    email: &str,
    phone: Option<&str>,
    note: Option<&str>,
    now: i64,
) -> std::result::Result<rsvp::Model, DbErr> {
    let active = rsvp::ActiveModel {
        id: Set(generate_record_id()),
        event_id: Set(evt.id.clone()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        phone: Set(phone.map(str::to_string)),
        note: Set(note.map(str::to_string)),
        verified: Set(false),
        verification_token: Set(Some(generate_verification_token())),
        list_sync_error: Set(None),
        created_at: Set(now),
    };

    let created = active.insert(conn).await?;

    event::Entity::update_many()
        .col_expr(
            event::Column::Registered,
            Expr::col(event::Column::Registered).add(1),
        )
        .col_expr(event::Column::UpdatedAt, Expr::value(now))
        .filter(event::Column::Id.eq(&evt.id))
        .exec(conn)
        .await?;

    Ok(created)
}

/// After the RSVP is committed: send the verification email and sync the
/// guest to the event's Brevo list. Both are non-fatal; the RSVP stays
/// persisted (and unverified) if delivery fails.
async fn post_persist(
    env: &Env,
    db: &sea_orm::DatabaseConnection,
    evt: &event::Model,
    record: &rsvp::Model,
) {
    if !brevo::brevo_is_configured(env) {
        worker::console_log!("Brevo not configured; skipping delivery for rsvp {}", record.id);
        return;
    }

    if let Some(token) = record.verification_token.as_deref() {
        if let Err(e) =
            brevo::send_verification(env, &record.email, &record.name, &evt.title, token).await
        {
            worker::console_log!("Verification email failed for rsvp {}: {e}", record.id);
        }
    }

    if let Some(list_id) = evt.brevo_list_id {
        if let Err(msg) = brevo::add_contact(env, &record.email, &record.name, list_id).await {
            worker::console_log!("Contact sync failed for rsvp {}: {msg}", record.id);
            let _ = rsvp::Entity::update_many()
                .col_expr(rsvp::Column::ListSyncError, Expr::value(msg))
                .filter(rsvp::Column::Id.eq(&record.id))
                .exec(db)
                .await;
        }
    }
}

async fn clear_pending(db: &sea_orm::DatabaseConnection, session_id: &str, event_id: &str) {
    let _ = pending_rsvp::Entity::delete_by_id((session_id.to_string(), event_id.to_string()))
        .exec(db)
        .await;
}

/// RSVP submission: rate limit, gate check, then the intake decision.
pub async fn handle_submit(
    mut req: Request,
    env: &Env,
    limiter: &FixedWindowLimiter,
    event_id: String,
) -> Result<Response> {
    if rate_limited(&req, limiter) {
        return error_response(&req, 429, "rate_limited", "Too many attempts; try again later");
    }

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

    // An un-granted session goes back to the gate, not to a content error.
    if evt.passcode_hash.is_some() && !session::has_grant(&db, &ctx.session.id, &evt.id).await? {
        return error_response(&req, 401, "passcode_required", "This event requires a passcode");
    }

    let submission: RsvpSubmission = match req.json().await {
        Ok(p) => p,
        Err(e) => {
            worker::console_log!("Invalid RSVP payload: {e}");
            return error_response(&req, 400, "invalid_json", "Invalid JSON body");
        }
    };

    // The scan and the insert share a transaction so two submissions with
    // the same name cannot both pass the exact-duplicate check.
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(e) => return db_error_response(&req, "Failed to start transaction", &e),
    };

    let existing = match rsvp::Entity::find()
        .filter(rsvp::Column::EventId.eq(&evt.id))
        .order_by_asc(rsvp::Column::CreatedAt)
        .all(&txn)
        .await
    {
        Ok(rows) => rows,
        Err(e) => return db_error_response(&req, "Failed to scan RSVPs", &e),
    };

    let now = now_ts();

    match intake::evaluate(&submission, &existing) {
        IntakeOutcome::Invalid(e) => {
            let _ = txn.rollback().await;
            error_response(&req, 400, e.code(), e.message())
        }
        IntakeOutcome::NameTaken { .. } => {
            let _ = txn.rollback().await;
            error_response(
                &req,
                409,
                "name_taken",
                "Someone already registered under this name",
            )
        }
        IntakeOutcome::Stage(m) => {
            let _ = txn.rollback().await;

            if let Err(e) = stage_pending(&db, &ctx, &evt.id, &submission, now).await {
                return db_error_response(&req, "Failed to stage RSVP", &e);
            }

            let mut resp = Response::from_json(&serde_json::json!({
                "staged": true,
                "warning": {
                    "email": m.email,
                    "phone": m.phone,
                },
            }))?
            .with_status(409);
            if ctx.fresh {
                set_session_cookie(&mut resp, &ctx.session.id, ttl)?;
            }
            json_with_cors(&req, resp)
        }
        IntakeOutcome::Persist => {
            let persisted = persist_rsvp(
                &txn,
                &evt,
                submission.name_trimmed(),
                submission.email_trimmed(),
                submission.phone_trimmed(),
                submission.note_trimmed(),
                now,
            )
            .await;

            let record = match persisted {
                Ok(record) => record,
                Err(e) => {
                    let _ = txn.rollback().await;
                    worker::console_log!("Failed to save RSVP: {e}");
                    return error_response(&req, 500, "save_failed", "Could not save RSVP");
                }
            };

            if let Err(e) = txn.commit().await {
                worker::console_log!("Failed to commit RSVP: {e}");
                return error_response(&req, 500, "save_failed", "Could not save RSVP");
            }

            // A clean persist clears any stale pending stage for this slot.
            clear_pending(&db, &ctx.session.id, &evt.id).await;

            post_persist(env, &db, &evt, &record).await;

            let mut resp = Response::from_json(&serde_json::json!({
                "id": record.id,
                "eventId": evt.id,
                "verified": false,
            }))?
            .with_status(201);
            if ctx.fresh {
                set_session_cookie(&mut resp, &ctx.session.id, ttl)?;
            }
            json_with_cors(&req, resp)
        }
    }
}

/// Overwrite the session's pending slot for this event with the new
/// submission. At most one staged RSVP exists per (session, event).
async fn stage_pending(
    db: &sea_orm::DatabaseConnection,
    ctx: &SessionContext,
    event_id: &str,
    submission: &RsvpSubmission,
    now: i64,
) -> std::result::Result<(), DbErr> {
    let active = pending_rsvp::ActiveModel {
        session_id: Set(ctx.session.id.clone()),
        event_id: Set(event_id.to_string()),
        name: Set(submission.name_trimmed().to_string()),
        email: Set(submission.email_trimmed().to_string()),
        phone: Set(submission.phone_trimmed().map(str::to_string)),
        note: Set(submission.note_trimmed().map(str::to_string)),
        created_at: Set(now),
    };

    let res = pending_rsvp::Entity::insert(active)
        .on_conflict(
            OnConflict::columns([
                pending_rsvp::Column::SessionId,
                pending_rsvp::Column::EventId,
            ])
            .update_columns([
                pending_rsvp::Column::Name,
                pending_rsvp::Column::Email,
                pending_rsvp::Column::Phone,
                pending_rsvp::Column::Note,
                pending_rsvp::Column::CreatedAt,
            ])
            .to_owned(),
        )
        .exec(db)
        .await;

    match res {
        Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Explicit confirmation of a staged soft-duplicate submission. Persists
/// unconditionally: the guest has seen the warning, so no second duplicate
/// scan runs.
pub async fn handle_confirm(
    req: Request,
    env: &Env,
    limiter: &FixedWindowLimiter,
    event_id: String,
) -> Result<Response> {
    if rate_limited(&req, limiter) {
        return error_response(&req, 429, "rate_limited", "Too many attempts; try again later");
    }

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

    let Some(sess) = session::load(&req, &db).await? else {
        return error_response(
            &req,
            400,
            "no_pending_rsvp",
            "No RSVP is awaiting confirmation",
        );
    };

    if evt.passcode_hash.is_some() && !session::has_grant(&db, &sess.id, &evt.id).await? {
        return error_response(&req, 401, "passcode_required", "This event requires a passcode");
    }

    let pending = match pending_rsvp::Entity::find_by_id((sess.id.clone(), evt.id.clone()))
        .one(&db)
        .await
    {
        Ok(found) => found,
        Err(e) => return db_error_response(&req, "Failed to load pending RSVP", &e),
    };
    let Some(pending) = pending else {
        return error_response(
            &req,
            400,
            "no_pending_rsvp",
            "No RSVP is awaiting confirmation",
        );
    };

    if let Err(e) = intake::validate_confirm(&pending.name, &pending.email) {
        return error_response(&req, 400, e.code(), e.message());
    }

    let now = now_ts();
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(e) => return db_error_response(&req, "Failed to start transaction", &e),
    };

    let persisted = persist_rsvp(
        &txn,
        &evt,
        pending.name.trim(),
        pending.email.trim(),
        pending.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()),
        pending.note.as_deref(),
        now,
    )
    .await;

    let record = match persisted {
        Ok(record) => record,
        Err(e) => {
            let _ = txn.rollback().await;
            worker::console_log!("Failed to save confirmed RSVP: {e}");
            return error_response(&req, 500, "save_failed", "Could not save RSVP");
        }
    };

    if let Err(e) = txn.commit().await {
        worker::console_log!("Failed to commit confirmed RSVP: {e}");
        return error_response(&req, 500, "save_failed", "Could not save RSVP");
    }

    clear_pending(&db, &sess.id, &evt.id).await;

    post_persist(env, &db, &evt, &record).await;

    let resp = Response::from_json(&serde_json::json!({
        "id": record.id,
        "eventId": evt.id,
        "confirmed": true,
        "verified": false,
    }))?
    .with_status(201);
    json_with_cors(&req, resp)
}
