//! Close handshake: title-bar close with native fallbacks, gated by a
//! minimum-lifetime grace period.

use std::{
    thread,
    time::{Duration, Instant},
};

use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    observability::{record_close_retry, record_native_close_fallback},
    title_bar::TitleBar,
    window::Window,
};

/// Settle time before retrying a close whose element started disappearing.
pub const CLOSE_RETRY_DELAY: Duration = Duration::from_millis(100);

/// One-shot minimum-lifetime deadline recorded when a window is attached.
#[derive(Clone, Copy, Debug)]
pub struct GracePeriod {
    deadline: Instant,
}

impl GracePeriod {
    /// Start a grace period of `length` from now.
    pub fn start(length: Duration) -> Self {
        let now = Instant::now();
        Self {
            deadline: now.checked_add(length).unwrap_or(now),
        }
    }

    /// Time left before the grace period elapses.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// True once the deadline has passed.
    pub fn has_elapsed(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Block until the deadline has passed. Returns immediately once elapsed.
    pub fn wait(&self) {
        let remaining = self.remaining();
        if !remaining.is_zero() {
            debug!(?remaining, "close: waiting out grace period");
            thread::sleep(remaining);
        }
    }
}

/// States of the close handshake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CloseStep {
    /// Click the title bar's close button.
    TitleBar,
    /// Issue the native close command.
    Native,
    /// Wait for the provider to settle, then issue the native close once more.
    Retry,
    /// The window is closed or presumed gone.
    Done,
}

/// How a close attempt finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The window was already closed by an earlier call.
    AlreadyClosed,
    /// Closed through the title-bar close button.
    TitleBar,
    /// Closed through the native close command.
    Native,
    /// Closed (or found gone) after the delayed retry.
    Retried,
}

pub(crate) fn close(window: &Window) -> Result<CloseOutcome> {
    if window.is_marked_closed() {
        debug!(element = %window.element(), "close: already closed");
        return Ok(CloseOutcome::AlreadyClosed);
    }
    if let Some(grace) = window.grace_period() {
        grace.wait();
    }

    let element = window.element();
    let services = window.services();
    let mut step = CloseStep::TitleBar;
    let mut outcome = CloseOutcome::TitleBar;
    // The title bar refused the click; the native close is then the last word.
    let mut automation_fallback = false;

    while step != CloseStep::Done {
        debug!(element = %element, ?step, "close: step");
        step = match step {
            CloseStep::TitleBar => match click_title_bar_close(window) {
                Ok(true) => CloseStep::Done,
                Ok(false) => {
                    outcome = CloseOutcome::Native;
                    CloseStep::Native
                }
                Err(Error::Automation(msg)) => {
                    debug!(element = %element, %msg, "close: title bar failed, falling back to native close");
                    record_native_close_fallback(element);
                    automation_fallback = true;
                    outcome = CloseOutcome::Native;
                    CloseStep::Native
                }
                Err(e) if e.is_gone() => CloseStep::Retry,
                Err(e) => return Err(e),
            },
            CloseStep::Native => match services.commands.close(element) {
                Ok(()) => CloseStep::Done,
                Err(e) if e.is_gone() => CloseStep::Retry,
                Err(Error::Automation(msg)) if automation_fallback => {
                    debug!(element = %element, %msg, "close: native fallback failed; treating window as closed");
                    CloseStep::Done
                }
                Err(e) => return Err(e),
            },
            CloseStep::Retry => {
                record_close_retry(element);
                outcome = CloseOutcome::Retried;
                thread::sleep(CLOSE_RETRY_DELAY);
                match services.commands.close(element) {
                    Ok(()) => CloseStep::Done,
                    // A second disappearance means the window is already gone.
                    // Other failure kinds still propagate.
                    Err(e) if e.is_gone() => {
                        debug!(element = %element, error = %e, "close: window gone during retry");
                        CloseStep::Done
                    }
                    Err(e) => return Err(e),
                }
            }
            CloseStep::Done => CloseStep::Done,
        };
    }

    if let Err(e) = window.action_performed() {
        debug!(element = %element, error = %e, "close: post-close readiness check failed");
    }
    window.mark_closed();
    info!(element = %element, ?outcome, "window closed");
    Ok(outcome)
}

/// Click the title bar's close button. `Ok(false)` when either the title bar
/// or its close button does not resolve.
fn click_title_bar_close(window: &Window) -> Result<bool> {
    let services = window.services();
    let Some(title_bar) = TitleBar::find(services, window.element())? else {
        return Ok(false);
    };
    let Some(button) = title_bar.close_button(services)? else {
        return Ok(false);
    };
    debug!(element = %window.element(), button = %button, "close: using title bar close button");
    services.commands.invoke(button)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grace_period_blocks_until_deadline() {
        let grace = GracePeriod::start(Duration::from_millis(40));
        assert!(!grace.has_elapsed());
        let start = Instant::now();
        grace.wait();
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert!(grace.has_elapsed());
    }

    #[test]
    fn elapsed_grace_period_does_not_block() {
        let grace = GracePeriod::start(Duration::ZERO);
        let start = Instant::now();
        grace.wait();
        assert!(start.elapsed() < Duration::from_millis(20));
    }
}
