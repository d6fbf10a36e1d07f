use std::sync::Arc;

use config::HarnessConfig;
use winharness::{DisplayState, Error as HarnessError, VisualState, mock::MockDesktop};

use super::support::{attach, fast};
use crate::error::{Error, Result, ensure};

pub fn no_op(base: &HarnessConfig) -> Result<()> {
    let mock = Arc::new(MockDesktop::new());
    let window = attach(&mock, fast(base))?;
    for state in DisplayState::ALL {
        mock.set_visual(state.visual());
        mock.clear_calls();
        window.set_display_state(state)?;
        ensure(
            !mock.calls().iter().any(|c| c.starts_with("set_visual_state")),
            format!("native setter called for current state {state}"),
        )?;
    }
    Ok(())
}

pub fn title_bar_fallback(base: &HarnessConfig) -> Result<()> {
    let mock = Arc::new(MockDesktop::new());
    mock.set_honour_visual_setter(false);
    let window = attach(&mock, fast(base))?;
    window.set_display_state(DisplayState::Maximized)?;
    let state = window.display_state()?;
    ensure(
        state == DisplayState::Maximized,
        format!("window ended {state}"),
    )
}

pub fn unknown_state(base: &HarnessConfig) -> Result<()> {
    let mock = Arc::new(MockDesktop::new());
    let window = attach(&mock, fast(base))?;
    mock.set_visual(VisualState(9));
    match window.display_state() {
        Err(HarnessError::UnknownDisplayState { raw: 9 }) => Ok(()),
        Err(e) => Err(Error::Harness(e)),
        Ok(s) => ensure(false, format!("unmapped state read as {s}")),
    }
}
