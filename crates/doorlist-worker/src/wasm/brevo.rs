use serde::Serialize;
use worker::{Env, Headers, Method, Request, RequestInit, Result};

use crate::worker_wasm::env::{env_string, public_base_url};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoEmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoSendEmailBody {
    sender: BrevoEmailAddress,
    to: Vec<BrevoEmailAddress>,
    subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_content: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoCreateContactBody {
    email: String,
    attributes: serde_json::Value,
    list_ids: Vec<i64>,
    update_enabled: bool,
}

fn require_env(env: &Env, key: &str) -> std::result::Result<String, worker::Error> {
    let Some(v) = env_string(env, key) else {
        return Err(worker::Error::RustError(format!("{key} is required")));
    };
    let v = v.trim().to_string();
    if v.is_empty() {
        return Err(worker::Error::RustError(format!("{key} is required")));
    }
    Ok(v)
}

fn is_success_status(status: u16) -> bool {
    (200..=299).contains(&status)
}

pub fn brevo_is_configured(env: &Env) -> bool {
    env_string(env, "BREVO_API_KEY").is_some_and(|v| !v.trim().is_empty())
        && env_string(env, "BREVO_SENDER_EMAIL").is_some_and(|v| !v.trim().is_empty())
}

async fn brevo_post(env: &Env, url: &str, json: String) -> Result<(u16, String)> {
    let api_key = require_env(env, "BREVO_API_KEY")?;

    let headers = Headers::new();
    headers.set("api-key", &api_key)?;
    headers.set("Content-Type", "application/json")?;
    headers.set("Accept", "application/json")?;
    headers.set("User-Agent", "doorlist/0.1 (Cloudflare Worker)")?;

    let mut init = RequestInit::new();
    init.with_method(Method::Post);
    init.with_headers(headers);
    init.with_body(Some(json.into()));

    let req = Request::new_with_init(url, &init)?;

    let mut resp = worker::Fetch::Request(req).send().await?;
    let status = resp.status_code();
    let body = resp.text().await.unwrap_or_default();
    Ok((status, body))
}

pub async fn send_email(
    env: &Env,
    to_email: &str,
    to_name: Option<&str>,
    subject: &str,
    html: Option<String>,
    text: Option<String>,
) -> Result<()> {
    let from_email = require_env(env, "BREVO_SENDER_EMAIL")?;
    let from_name = env_string(env, "BREVO_SENDER_NAME");

    let body = BrevoSendEmailBody {
        sender: BrevoEmailAddress {
            email: from_email,
            name: from_name,
        },
        to: vec![BrevoEmailAddress {
            email: to_email.to_string(),
            name: to_name.map(|s| s.to_string()),
        }],
        subject: subject.to_string(),
        html_content: html,
        text_content: text,
    };

    let json = serde_json::to_string(&body)
        .map_err(|e| worker::Error::RustError(format!("Failed to serialize Brevo payload: {e}")))?;

    let (status, body) = brevo_post(env, "https://api.brevo.com/v3/smtp/email", json).await?;
    if is_success_status(status) {
        return Ok(());
    }

    Err(worker::Error::RustError(format!(
        "Brevo send failed (status={status}): {body}"
    )))
}

/// Deliver the single-use RSVP verification link.
pub async fn send_verification(
    env: &Env,
    to_email: &str,
    display_name: &str,
    event_title: &str,
    token: &str,
) -> Result<()> {
    let verify_url = match public_base_url(env) {
        Some(base) => format!("{base}/api/verify/{token}"),
        None => format!("/api/verify/{token}"),
    };

    let subject = format!("Confirm your RSVP for {event_title}");
    let text = format!(
        "Hi {display_name},\n\n\
         Please confirm your RSVP for {event_title} by opening this link:\n\
         {verify_url}\n\n\
         If you did not register, you can ignore this message.\n"
    );
    let html = format!(
        "<p>Hi {display_name},</p>\
         <p>Please confirm your RSVP for <strong>{event_title}</strong> by \
         <a href=\"{verify_url}\">clicking here</a>.</p>\
         <p>If you did not register, you can ignore this message.</p>"
    );

    send_email(env, to_email, Some(display_name), &subject, Some(html), Some(text)).await
}

/// Add a confirmed guest to the event's Brevo contact list.
///
/// Returns the failure message instead of an error so callers can record it
/// on the RSVP without treating the sync as fatal.
pub async fn add_contact(
    env: &Env,
    email: &str,
    name: &str,
    list_id: i64,
) -> std::result::Result<(), String> {
    let body = BrevoCreateContactBody {
        email: email.to_string(),
        attributes: serde_json::json!({ "FIRSTNAME": name }),
        list_ids: vec![list_id],
        update_enabled: true,
    };

    let json = serde_json::to_string(&body)
        .map_err(|e| format!("Failed to serialize Brevo contact payload: {e}"))?;

    match brevo_post(env, "https://api.brevo.com/v3/contacts", json).await {
        Ok((status, _)) if is_success_status(status) => Ok(()),
        Ok((status, body)) => Err(format!("Brevo contact sync failed (status={status}): {body}")),
        Err(e) => Err(format!("Brevo contact sync failed: {e}")),
    }
}
