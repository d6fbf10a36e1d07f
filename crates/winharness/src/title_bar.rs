//! Title-bar lookup and the button clicks used when native commands fall short.

use tracing::debug;

use crate::{
    display::DisplayState,
    error::Result,
    ops::{Attribute, ControlType, Criteria, ElementRef},
    services::Services,
};

/// Automation id of the title-bar close button.
pub const CLOSE_BUTTON_ID: &str = "Close";
/// Automation id of the minimize button.
pub const MINIMIZE_BUTTON_ID: &str = "Minimize";
/// Automation id of the maximize button.
pub const MAXIMIZE_BUTTON_ID: &str = "Maximize";
/// Automation id of the restore button.
pub const RESTORE_BUTTON_ID: &str = "Restore";

/// Title bar of a top-level window, resolved on demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TitleBar {
    element: ElementRef,
}

impl TitleBar {
    /// Resolve the title bar below `window`, if the provider exposes one.
    pub fn find(services: &Services, window: ElementRef) -> Result<Option<Self>> {
        let found = services
            .accessibility
            .find_descendant(window, &Criteria::ControlType(ControlType::TitleBar))?;
        Ok(found.map(|element| Self { element }))
    }

    pub fn element(&self) -> ElementRef {
        self.element
    }

    /// Name of the title bar, which carries the window title.
    pub fn name(&self, services: &Services) -> Result<String> {
        services
            .accessibility
            .read_attribute(self.element, Attribute::Name)?
            .into_text(Attribute::Name)
    }

    fn button(&self, services: &Services, id: &str) -> Result<Option<ElementRef>> {
        services
            .accessibility
            .find_descendant(self.element, &Criteria::automation_id(id))
    }

    pub fn close_button(&self, services: &Services) -> Result<Option<ElementRef>> {
        self.button(services, CLOSE_BUTTON_ID)
    }

    pub fn minimize_button(&self, services: &Services) -> Result<Option<ElementRef>> {
        self.button(services, MINIMIZE_BUTTON_ID)
    }

    pub fn maximize_button(&self, services: &Services) -> Result<Option<ElementRef>> {
        self.button(services, MAXIMIZE_BUTTON_ID)
    }

    pub fn restore_button(&self, services: &Services) -> Result<Option<ElementRef>> {
        self.button(services, RESTORE_BUTTON_ID)
    }

    /// Drive a display-state change with the title-bar glyphs. Restoring falls
    /// back to the maximize button, which toggles on most providers. A missing
    /// button is not an error.
    pub fn set_display_state(&self, services: &Services, state: DisplayState) -> Result<()> {
        let button = match state {
            DisplayState::Minimized => self.minimize_button(services)?,
            DisplayState::Maximized => self.maximize_button(services)?,
            DisplayState::Restored => match self.restore_button(services)? {
                Some(b) => Some(b),
                None => self.maximize_button(services)?,
            },
        };
        match button {
            Some(b) => {
                debug!(title_bar = %self.element, button = %b, %state, "title bar: invoking button");
                services.commands.invoke(b)
            }
            None => {
                debug!(title_bar = %self.element, %state, "title bar: no button for state");
                Ok(())
            }
        }
    }
}
