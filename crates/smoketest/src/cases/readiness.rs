use std::sync::Arc;

use config::HarnessConfig;
use winharness::{CursorId, Error as HarnessError, InteractionState, mock::MockDesktop};

use super::support::{attach, fast};
use crate::error::{Error, Result, ensure};

pub fn recovers(base: &HarnessConfig) -> Result<()> {
    let mock = Arc::new(MockDesktop::new());
    mock.script_interaction(&[
        InteractionState::NotResponding,
        InteractionState::NotResponding,
        InteractionState::ReadyForUserInteraction,
    ]);
    let _window = attach(&mock, fast(base))?;
    ensure(
        mock.calls_contains("process_idle:4242"),
        "process idle wait was skipped",
    )
}

pub fn times_out(base: &HarnessConfig) -> Result<()> {
    let mock = Arc::new(MockDesktop::new());
    mock.script_interaction(&[InteractionState::NotResponding]);
    match attach(&mock, fast(base)) {
        Err(Error::Harness(e)) => ensure(
            e.last_observed() == Some("NotResponding"),
            format!("unexpected failure: {e}"),
        ),
        Err(e) => Err(e),
        Ok(_) => ensure(false, "unresponsive window was reported ready"),
    }
}

pub fn hourglass(base: &HarnessConfig) -> Result<()> {
    let mock = Arc::new(MockDesktop::new());
    mock.script_cursors(&[CursorId::Wait, CursorId::Wait, CursorId::Arrow]);
    let cfg = HarnessConfig {
        wait_on_hourglass: true,
        nudge_pointer_for_hourglass: true,
        ..fast(base)
    };
    let _window = attach(&mock, cfg)?;
    let nudges = mock.call_count("nudge");
    ensure(nudges == 2, format!("expected 2 nudges, saw {nudges}"))
}

pub fn process_exited(base: &HarnessConfig) -> Result<()> {
    let mock = Arc::new(MockDesktop::new());
    mock.set_process_exited(true);
    match attach(&mock, fast(base)) {
        Err(Error::Harness(HarnessError::NotResponding { source })) => ensure(
            matches!(*source, HarnessError::ProcessNotFound(_)),
            format!("unexpected cause: {source}"),
        ),
        Err(e) => Err(e),
        Ok(_) => ensure(false, "window of an exited process was reported ready"),
    }
}
