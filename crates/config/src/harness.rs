use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, defaults::*};

/// Process-wide behaviour knobs for windows driven by the harness.
///
/// Values are read-only once loaded; share one instance behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Upper bound for every readiness wait, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Poll until the pointer stops showing a wait cursor.
    #[serde(default = "default_true")]
    pub wait_on_hourglass: bool,
    /// Nudge the pointer between cursor polls; some providers only refresh the
    /// cursor shape on movement.
    #[serde(default)]
    pub nudge_pointer_for_hourglass: bool,
    /// The harness runs inside the application under test.
    #[serde(default)]
    pub in_process: bool,
    /// Leave windows open when their handle is dropped.
    #[serde(default)]
    pub keep_open_on_dispose: bool,
    /// Minimum lifetime of a window before a close may proceed, in milliseconds.
    #[serde(default = "default_min_open_time_ms")]
    pub min_open_time_ms: u64,
    /// Pause between observations in bounded waits, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: BUSY_TIMEOUT_MS,
            wait_on_hourglass: true,
            nudge_pointer_for_hourglass: false,
            in_process: false,
            keep_open_on_dispose: false,
            min_open_time_ms: MIN_OPEN_TIME_MS,
            poll_interval_ms: POLL_INTERVAL_MS,
        }
    }
}

impl HarnessConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub fn min_open_time(&self) -> Duration {
        Duration::from_millis(self.min_open_time_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn wait_on_hourglass(&self) -> bool {
        self.wait_on_hourglass
    }

    pub fn nudge_pointer(&self) -> bool {
        self.nudge_pointer_for_hourglass
    }

    pub fn in_process(&self) -> bool {
        self.in_process
    }

    pub fn keep_open_on_dispose(&self) -> bool {
        self.keep_open_on_dispose
    }

    /// Reject values that would make waits meaningless.
    pub fn validate(&self) -> Result<(), Error> {
        if self.busy_timeout_ms == 0 {
            return Err(Error::Validation {
                path: None,
                field: "busy_timeout_ms",
                message: "busy timeout must be greater than zero".to_string(),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Validation {
                path: None,
                field: "poll_interval_ms",
                message: "poll interval must be greater than zero".to_string(),
            });
        }
        if self.poll_interval_ms > self.busy_timeout_ms {
            return Err(Error::Validation {
                path: None,
                field: "poll_interval_ms",
                message: format!(
                    "poll interval ({} ms) exceeds busy timeout ({} ms)",
                    self.poll_interval_ms, self.busy_timeout_ms
                ),
            });
        }
        Ok(())
    }
}
