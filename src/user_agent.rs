//! Shared User-Agent string for every request the tool makes.

/// User-Agent sent to both backends.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("pen-downloader/{version}")
}
