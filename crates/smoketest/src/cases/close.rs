use std::{sync::Arc, time::Instant};

use config::HarnessConfig;
use winharness::{CLOSE_RETRY_DELAY, CloseOutcome, Error as HarnessError, mock::MockDesktop};

use super::support::{attach, fast};
use crate::error::{Result, ensure};

pub fn title_bar(base: &HarnessConfig) -> Result<()> {
    let mock = Arc::new(MockDesktop::new());
    let window = attach(&mock, fast(base))?;
    let outcome = window.close()?;
    ensure(
        outcome == CloseOutcome::TitleBar,
        format!("closed via {outcome:?}"),
    )?;
    ensure(
        !mock.calls_contains("close"),
        "native close used despite a title bar",
    )
}

pub fn native(base: &HarnessConfig) -> Result<()> {
    let mock = Arc::new(MockDesktop::new());
    mock.set_title_bar(false);
    let window = attach(&mock, fast(base))?;
    window.close()?;
    let n = mock.call_count("close");
    ensure(n == 1, format!("native close issued {n} times"))
}

pub fn retry(base: &HarnessConfig) -> Result<()> {
    let mock = Arc::new(MockDesktop::new());
    mock.push_invoke_error(HarnessError::Unavailable);
    mock.push_close_error(HarnessError::Unavailable);
    let window = attach(&mock, fast(base))?;
    let start = Instant::now();
    let outcome = window.close()?;
    ensure(
        outcome == CloseOutcome::Retried,
        format!("closed via {outcome:?}"),
    )?;
    ensure(
        start.elapsed() >= CLOSE_RETRY_DELAY,
        "retry did not wait for the provider to settle",
    )
}

pub fn grace(base: &HarnessConfig) -> Result<()> {
    let mock = Arc::new(MockDesktop::new());
    let cfg = HarnessConfig {
        min_open_time_ms: base.min_open_time_ms,
        ..fast(base)
    };
    let before = Instant::now();
    let window = attach(&mock, cfg)?;
    window.close()?;
    let waited = mock
        .first_call_at("invoke:#3")
        .map(|at| at.duration_since(before));
    ensure(
        waited.is_some_and(|w| w >= base.min_open_time()),
        format!("close issued after {waited:?}, before the grace period"),
    )
}
