//! Checks for configured route paths before they reach the axum router,
//! which panics on paths it cannot register.

use anyhow::bail;

/// Path of the health route every leaps listener serves.
pub const HEALTH_PATH: &str = "/healthz";

/// Validate a configured route path.
///
/// Accepts `/` and absolute paths made of literal segments, with an optional
/// trailing `/`. Rejects empty segments, `:` and `*` captures, and any path
/// listed in `reserved`.
pub fn validate_route_path(kind: &str, path: &str, reserved: &[&str]) -> anyhow::Result<()> {
    if !path.starts_with('/') {
        bail!("{kind} path must start with '/', got {path:?}");
    }

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        // 只剩根路径
        if path.len() > 1 {
            bail!("{kind} path {path:?} contains an empty segment");
        }
        return Ok(());
    }

    for segment in trimmed[1..].split('/') {
        if segment.is_empty() {
            bail!("{kind} path {path:?} contains an empty segment");
        }
        if segment.contains(':') || segment.contains('*') {
            bail!("{kind} path {path:?} must not contain ':' or '*' captures");
        }
    }

    if reserved.iter().any(|r| r.trim_end_matches('/') == trimmed) {
        bail!("{kind} path {path:?} collides with a built-in route");
    }
    Ok(())
}
