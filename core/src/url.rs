//! Base URL normalization and path joining.

/// Scheme every normalized base URL starts with.
pub const SECURE_PREFIX: &str = "https://";

/// Canonical base URL for `host`: `https://` is prepended unless already
/// present and trailing slashes are removed. The host itself is not
/// validated; a bad one fails at request time.
pub fn normalize_base_url(host: &str) -> String {
    let url = if host.starts_with(SECURE_PREFIX) {
        host.to_string()
    } else {
        format!("{SECURE_PREFIX}{host}")
    };
    url.trim_end_matches('/').to_string()
}

/// Join `base` and `path` with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
