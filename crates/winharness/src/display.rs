//! Display states and the fixed mapping onto native visual states.

use std::fmt::{Display, Formatter, Result as FmtResult};

use tracing::debug;

use crate::{
    error::{Error, Result, ResultExt},
    ops::{Attribute, VisualState},
    title_bar::TitleBar,
    window::Window,
};

/// Harness-level display state of a window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisplayState {
    /// Normal (restored) size.
    Restored,
    /// Minimized to the task bar / dock.
    Minimized,
    /// Maximized to the work area.
    Maximized,
}

impl DisplayState {
    /// All display states, in table order.
    pub const ALL: [Self; 3] = [Self::Maximized, Self::Minimized, Self::Restored];

    /// Native visual state this display state maps to.
    pub fn visual(self) -> VisualState {
        // The table is checked for completeness at compile time, so the
        // fallback is never taken.
        DISPLAY_STATE_TABLE
            .iter()
            .find(|(s, _)| *s == self)
            .map_or(VisualState::NORMAL, |(_, v)| *v)
    }

    /// Display state for a native visual state, if the table maps it.
    pub fn from_visual(visual: VisualState) -> Option<Self> {
        DISPLAY_STATE_TABLE
            .iter()
            .find(|(_, v)| *v == visual)
            .map(|(s, _)| *s)
    }

    /// Like [`DisplayState::from_visual`], but an unmapped value is the fatal
    /// "unknown state" error: the query itself is unreliable, usually because
    /// the window closed.
    pub fn try_from_visual(visual: VisualState) -> Result<Self> {
        Self::from_visual(visual).ok_or(Error::UnknownDisplayState { raw: visual.0 })
    }
}

impl Display for DisplayState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            Self::Restored => "restored",
            Self::Minimized => "minimized",
            Self::Maximized => "maximized",
        };
        f.write_str(s)
    }
}

/// Bidirectional display-state mapping. Exactly one entry per display state and
/// per native value.
pub const DISPLAY_STATE_TABLE: [(DisplayState, VisualState); 3] = [
    (DisplayState::Maximized, VisualState::MAXIMIZED),
    (DisplayState::Minimized, VisualState::MINIMIZED),
    (DisplayState::Restored, VisualState::NORMAL),
];

const fn table_is_bijective(table: &[(DisplayState, VisualState)]) -> bool {
    if table.len() != DisplayState::ALL.len() {
        return false;
    }
    let mut i = 0;
    while i < table.len() {
        let mut j = i + 1;
        while j < table.len() {
            if table[i].0 as u8 == table[j].0 as u8 || table[i].1.0 == table[j].1.0 {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const _: () = assert!(
    table_is_bijective(&DISPLAY_STATE_TABLE),
    "display-state table must map each state exactly once"
);

pub(crate) fn display_state(window: &Window) -> Result<DisplayState> {
    let visual = window
        .attribute(Attribute::VisualState)?
        .into_visual(Attribute::VisualState)?;
    DisplayState::try_from_visual(visual)
}

/// The window is in `target`, or `target` is one the window refuses outright.
fn is_satisfied(window: &Window, target: DisplayState) -> Result<bool> {
    if display_state(window)? == target {
        return Ok(true);
    }
    let capability = match target {
        DisplayState::Maximized => Attribute::CanMaximize,
        DisplayState::Minimized => Attribute::CanMinimize,
        DisplayState::Restored => return Ok(false),
    };
    let capable = window.attribute(capability)?.into_bool(capability)?;
    Ok(!capable)
}

/// A window that went away mid-operation is left alone.
fn skip_gone(window: &Window, target: DisplayState) -> Result<()> {
    debug!(element = %window.element(), %target, "display: window gone; nothing to do");
    Ok(())
}

pub(crate) fn set_display_state(window: &Window, target: DisplayState) -> Result<()> {
    let element = window.element();
    match is_satisfied(window, target).benign()? {
        None => return skip_gone(window, target),
        Some(true) => {
            debug!(element = %element, %target, "display: already satisfied");
            return Ok(());
        }
        Some(false) => {}
    }
    let services = window.services();
    debug!(element = %element, %target, visual = %target.visual(), "display: setting visual state");
    if services
        .commands
        .set_visual_state(element, target.visual())
        .benign()?
        .is_none()
    {
        return skip_gone(window, target);
    }
    window.action_performed()?;
    window.notify_location_changed()?;

    // Some providers only partly honour the native setter.
    match is_satisfied(window, target).benign()? {
        None => return skip_gone(window, target),
        Some(true) => return Ok(()),
        Some(false) => {}
    }
    if let Some(title_bar) = TitleBar::find(services, element)? {
        debug!(element = %element, %target, "display: native setter ignored; using title bar");
        title_bar.set_display_state(services, target)?;
        window.notify_location_changed()?;
    }
    Ok(())
}
