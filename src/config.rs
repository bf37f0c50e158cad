/// Application-level constants
pub const APP_NAME: &str = "Oncoguard";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}

/// Both component scores must reach this gate before an alternative may be
/// marked `best`. The gate applies per dimension, never to the composite.
pub const BEST_SCORE_GATE: u8 = 90;

/// Request timeout for the remote knowledge store.
pub const REMOTE_STORE_TIMEOUT_SECS: u64 = 10;

/// Ages above this are reported as implausible by the data-quality check.
pub const MAX_PLAUSIBLE_AGE: u16 = 120;
