//! Environment variable parsing helpers
//!
//! Missing or unparsable values fall back to the supplied default so pool
//! construction never panics on a malformed `DB_*` variable.

use std::str::FromStr;

/// Parse an environment variable, falling back to `default` when it is unset
/// or fails to parse.
///
/// # Example
/// ```ignore
/// let max: u32 = parse_env_with_default("DB_MAX_CONNECTIONS", 20);
/// ```
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parse a required environment variable.
pub fn parse_env_required<T: FromStr>(key: &str) -> Result<T, String> {
    std::env::var(key)
        .map_err(|_| format!("{} environment variable not set", key))?
        .trim()
        .parse()
        .map_err(|_| format!("Failed to parse environment variable {}", key))
}
