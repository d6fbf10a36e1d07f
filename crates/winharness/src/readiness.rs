//! "Wait while busy": the multi-stage readiness check run before the harness
//! touches a window.

use std::time::Duration;

use config::HarnessConfig;
use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    ops::{Attribute, InteractionState},
    retry::{RetryPolicy, poll_until, retry_until},
    services::Services,
    window::Window,
};

/// Class name of console host windows, which never report input idle.
pub const CONSOLE_WINDOW_CLASS: &str = "ConsoleWindowClass";

/// Extension point for window-specific readiness checks, run after the
/// built-in stages.
pub trait ReadinessHook: Send + Sync {
    /// Block until the window is ready or fail.
    fn wait(&self, window: &Window) -> Result<()>;
}

fn busy_policy(config: &HarnessConfig) -> RetryPolicy {
    RetryPolicy::new(config.busy_timeout()).with_interval(config.poll_interval())
}

/// Run every readiness stage. Stale and unavailable elements count as ready
/// (there is nothing left to wait for); every other failure is reported as
/// [`Error::NotResponding`].
pub(crate) fn wait_while_busy(window: &Window) -> Result<()> {
    match run_stages(window) {
        Ok(()) => Ok(()),
        Err(e) if e.is_benign() => {
            debug!(element = %window.element(), error = %e, "readiness: window gone, not waiting");
            Ok(())
        }
        Err(e) => Err(Error::not_responding(e)),
    }
}

fn run_stages(window: &Window) -> Result<()> {
    wait_for_process(window)?;
    wait_for_window(window)?;
    hourglass_wait(window.services(), window.config())?;
    if let Some(hook) = window.readiness_hook() {
        trace!(element = %window.element(), "readiness: custom wait");
        hook.wait(window)?;
    }
    Ok(())
}

/// Stage 1: the owning process must reach input idle. An exited process is a
/// hard failure, distinct from a timeout.
fn wait_for_process(window: &Window) -> Result<()> {
    let raw = window
        .attribute(Attribute::ProcessId)?
        .into_int(Attribute::ProcessId)?;
    let pid = u32::try_from(raw)
        .map_err(|_| Error::Automation(format!("invalid process id {raw}")))?;
    trace!(pid, "readiness: waiting for process idle");
    window.services().process.wait_for_input_idle(pid)
}

/// Stages 2 and 3: native window idle, then poll the interaction state until
/// the window stops reporting `NotResponding`.
fn wait_for_window(window: &Window) -> Result<()> {
    let config = window.config();
    let services = window.services();
    let element = window.element();

    if !config.in_process() && !is_console(window)? {
        let timeout = config.busy_timeout();
        if !services.commands.wait_for_input_idle(element, timeout)? {
            return Err(Error::Timeout {
                condition: "window input idle",
                elapsed: timeout,
                last: "busy".to_string(),
            });
        }
    }

    let polled = poll_until(
        busy_policy(config),
        || {
            window
                .attribute(Attribute::InteractionState)?
                .into_interaction(Attribute::InteractionState)
        },
        |state| *state != InteractionState::NotResponding,
    )?;
    let state = polled.into_result("interaction state")?;
    trace!(element = %element, %state, "readiness: interaction state settled");
    Ok(())
}

fn is_console(window: &Window) -> Result<bool> {
    let class = window
        .attribute(Attribute::ClassName)?
        .into_text(Attribute::ClassName)?;
    Ok(class == CONSOLE_WINDOW_CLASS)
}

/// Stage 4: wait until the pointer no longer shows a wait cursor. Disabled
/// unless `wait_on_hourglass` is set. When `nudge_pointer` is set the pointer
/// is moved after each busy observation so the provider refreshes the shape.
pub fn hourglass_wait(services: &Services, config: &HarnessConfig) -> Result<()> {
    if !config.wait_on_hourglass() {
        return Ok(());
    }
    let mut nudge_error = None;
    let polled = poll_until(
        busy_policy(config),
        || services.pointer.current_cursor(),
        |cursor| {
            if !cursor.is_wait() {
                return true;
            }
            if config.nudge_pointer()
                && let Err(e) = services.pointer.nudge()
            {
                nudge_error.get_or_insert(e);
            }
            false
        },
    )?;
    if let Some(e) = nudge_error {
        debug!(error = %e, "readiness: pointer nudge failed");
    }
    polled.into_result("hourglass cursor")?;
    Ok(())
}

/// Poll a caller predicate until it holds, failing with a timeout that
/// readiness callers recognise.
pub(crate) fn wait_till<F>(config: &HarnessConfig, timeout: Duration, check: F) -> Result<()>
where
    F: FnMut() -> bool,
{
    let policy = RetryPolicy::new(timeout).with_interval(config.poll_interval());
    if retry_until(policy, check) {
        Ok(())
    } else {
        Err(Error::not_responding(Error::Timeout {
            condition: "wait till",
            elapsed: timeout,
            last: "false".to_string(),
        }))
    }
}
