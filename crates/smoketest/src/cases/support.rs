//! Shared helpers for mock-driven cases.

use std::{cmp, sync::Arc};

use config::HarnessConfig;
use winharness::{Window, mock::MockDesktop};

use crate::error::Result;

/// Longest busy timeout a case waits for; keeps timeout cases quick.
const CASE_BUSY_TIMEOUT_MS: u64 = 500;

/// Poll cadence used by cases.
const CASE_POLL_INTERVAL_MS: u64 = 10;

/// Case config derived from the loaded one: short waits, no grace period.
pub fn fast(base: &HarnessConfig) -> HarnessConfig {
    HarnessConfig {
        busy_timeout_ms: cmp::min(base.busy_timeout_ms, CASE_BUSY_TIMEOUT_MS),
        poll_interval_ms: CASE_POLL_INTERVAL_MS,
        min_open_time_ms: 0,
        ..base.clone()
    }
}

/// Attach a window on `mock` using `cfg`.
pub fn attach(mock: &Arc<MockDesktop>, cfg: HarnessConfig) -> Result<Window> {
    Ok(Window::attach(
        MockDesktop::WINDOW,
        mock.services(),
        Arc::new(cfg),
    )?)
}
