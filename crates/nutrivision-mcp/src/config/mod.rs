//! Configuration loading and resolution.

/// Environment variable holding the vision API credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable holding the HTTP listen address.
pub const ADDR_ENV: &str = "NUTRIVISION_ADDR";

/// Listen address used when nothing else is configured.
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Resolve the vision API credential: explicit value, then environment, then empty.
///
/// An empty credential is accepted; the remote service rejects the call later.
pub fn resolve_api_key(explicit: Option<&str>) -> String {
    resolve(explicit, std::env::var(API_KEY_ENV).ok(), "")
}

/// Resolve the HTTP listen address.
pub fn resolve_addr(explicit: Option<&str>) -> String {
    resolve(explicit, std::env::var(ADDR_ENV).ok(), DEFAULT_ADDR)
}

fn resolve(explicit: Option<&str>, from_env: Option<String>, default: &str) -> String {
    if let Some(value) = explicit {
        return value.to_string();
    }

    if let Some(value) = from_env {
        return value;
    }

    default.to_string()
}
