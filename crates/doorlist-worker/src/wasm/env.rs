use worker::Env;

pub const DEFAULT_SESSION_TTL_SECS: i64 = 86_400;

pub fn normalize_env_value(raw: String) -> String {
    let trimmed = raw.trim();

    if let Some(inner) = trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        return inner.trim().to_string();
    }
    if let Some(inner) = trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return inner.trim().to_string();
    }

    trimmed.to_string()
}

pub fn env_string(env: &Env, key: &str) -> Option<String> {
    env.var(key)
        .ok()
        .map(|v| normalize_env_value(v.to_string()))
        .filter(|s| !s.is_empty())
}

/// Guest/admin session lifetime. Sessions have no other expiry mechanism,
/// so this is the knob that bounds grants and staged RSVPs.
pub fn session_ttl_secs(env: &Env) -> i64 {
    env_string(env, "SESSION_TTL_SECS")
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_SESSION_TTL_SECS)
}

/// Base URL used to build verification links, without a trailing slash.
pub fn public_base_url(env: &Env) -> Option<String> {
    env_string(env, "PUBLIC_BASE_URL").map(|s| s.trim_end_matches('/').to_string())
}
