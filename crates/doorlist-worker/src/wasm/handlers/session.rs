use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, Set};
use worker::{Request, Response, Result};

use crate::util::{generate_session_token, now_ts};
use crate::worker_wasm::http::{error_response, request_cookie, SESSION_COOKIE};

use entity::{guest_session, session_grant};

/// A live guest session, plus whether this request created it (and still
/// needs the cookie set on the outgoing response).
pub struct SessionContext {
    pub session: guest_session::Model,
    pub fresh: bool,
}

fn map_db_err(e: DbErr) -> worker::Error {
    worker::Error::RustError(e.to_string())
}

/// Load the session referenced by the request cookie, if it is still live.
/// Expired rows are treated as absent.
pub async fn load(req: &Request, db: &sea_orm::DatabaseConnection) -> Result<Option<guest_session::Model>> {
    let Some(token) = request_cookie(req, SESSION_COOKIE)? else {
        return Ok(None);
    };

    let found = guest_session::Entity::find_by_id(token)
        .one(db)
        .await
        .map_err(map_db_err)?;

    Ok(found.filter(|s| s.expires_at > now_ts()))
}

/// Load the cookie's session or create a new one.
pub async fn load_or_create(
    req: &Request,
    db: &sea_orm::DatabaseConnection,
    ttl_secs: i64,
) -> Result<SessionContext> {
    if let Some(session) = load(req, db).await? {
        return Ok(SessionContext { session, fresh: false });
    }

    let now = now_ts();
    let active = guest_session::ActiveModel {
        id: Set(generate_session_token()),
        admin: Set(false),
        created_at: Set(now),
        expires_at: Set(now + ttl_secs),
    };

    let session = active.insert(db).await.map_err(map_db_err)?;
    Ok(SessionContext { session, fresh: true })
}

pub async fn has_grant(
    db: &sea_orm::DatabaseConnection,
    session_id: &str,
    event_id: &str,
) -> Result<bool> {
    let found = session_grant::Entity::find_by_id((session_id.to_string(), event_id.to_string()))
        .one(db)
        .await
        .map_err(map_db_err)?;

    Ok(found.is_some())
}

/// Record a passcode grant. Idempotent: re-granting an already granted
/// event is a no-op.
pub async fn insert_grant(
    db: &sea_orm::DatabaseConnection,
    session_id: &str,
    event_id: &str,
) -> Result<()> {
    let active = session_grant::ActiveModel {
        session_id: Set(session_id.to_string()),
        event_id: Set(event_id.to_string()),
        created_at: Set(now_ts()),
    };

    let res = session_grant::Entity::insert(active)
        .on_conflict(
            OnConflict::columns([
                session_grant::Column::SessionId,
                session_grant::Column::EventId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec(db)
        .await;

    match res {
        Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
        Err(e) => Err(map_db_err(e)),
    }
}

pub enum AdminAccess {
    Granted(guest_session::Model),
    Denied(Response),
}

/// Gate for organizer endpoints: requires a live session that has passed
/// the admin-code login.
pub async fn require_admin(req: &Request, db: &sea_orm::DatabaseConnection) -> Result<AdminAccess> {
    match load(req, db).await? {
        Some(s) if s.admin => Ok(AdminAccess::Granted(s)),
        _ => Ok(AdminAccess::Denied(error_response(
            req,
            401,
            "unauthorized",
            "Admin session required",
        )?)),
    }
}
