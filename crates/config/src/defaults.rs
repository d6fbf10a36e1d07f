// Defaults for harness configuration

pub(crate) const BUSY_TIMEOUT_MS: u64 = 5000;
pub(crate) const MIN_OPEN_TIME_MS: u64 = 500;
pub(crate) const POLL_INTERVAL_MS: u64 = 200;

// Serde default functions
pub(crate) const fn default_busy_timeout_ms() -> u64 {
    BUSY_TIMEOUT_MS
}
pub(crate) const fn default_min_open_time_ms() -> u64 {
    MIN_OPEN_TIME_MS
}
pub(crate) const fn default_poll_interval_ms() -> u64 {
    POLL_INTERVAL_MS
}
pub(crate) const fn default_true() -> bool {
    true
}
