//! Constants for the download module (timeouts).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default idle read timeout (5 minutes without a byte from the server).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Interval between progress bar redraws in milliseconds.
pub const PROGRESS_TICK_MS: u64 = 120;
