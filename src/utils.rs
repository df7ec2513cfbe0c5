//! Small helpers for logging and URL handling.

use chrono::Local;
use url::Url;

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max).collect();
    format!("{}…(+{} bytes)", cut, s.len() - cut.len())
}

/// Resolve a navigation target against the server root.
///
/// Absolute URLs are returned unchanged; paths such as `/result/123.html`
/// are joined onto `base`.
pub fn resolve_destination(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    base.join(path)
}

/// Wall-clock stamp prefixed to status lines, e.g. `14:03:27`.
pub fn status_stamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}
