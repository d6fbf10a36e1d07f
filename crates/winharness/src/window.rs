//! The lifecycle shell: a handle to one top-level window.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use config::HarnessConfig;
use crossbeam_channel::Receiver;
use tracing::{debug, warn};

use crate::{
    close::{self, CloseOutcome, GracePeriod},
    display::{self, DisplayState},
    error::{Result, ResultExt},
    geom::Rect,
    ops::{
        AttrValue, Attribute, AutomationEvent, ControlType, Criteria, ElementRef, EventKind,
        Subscription, WindowIdent,
    },
    readiness::{self, ReadinessHook},
    services::Services,
    title_bar::TitleBar,
};

/// A top-level window driven by the harness.
///
/// Dropping the handle closes the window unless the configuration asks to
/// keep windows open or the window has already been closed. A `Window` is
/// meant to be driven from one thread at a time.
pub struct Window {
    element: ElementRef,
    services: Services,
    config: Arc<HarnessConfig>,
    /// Started once construction succeeded; a half-built window is never
    /// closed on drop.
    grace: Option<GracePeriod>,
    closed: AtomicBool,
    hook: Option<Arc<dyn ReadinessHook>>,
    subscription: Option<Subscription>,
}

impl Window {
    /// Take ownership of `element` as a harness window.
    ///
    /// Waits for the window to become ready, warns when it is partly off the
    /// desktop, registers it with the session and starts the grace period that
    /// gates [`Window::close`].
    pub fn attach(
        element: ElementRef,
        services: Services,
        config: Arc<HarnessConfig>,
    ) -> Result<Self> {
        let mut window = Self {
            element,
            services,
            config,
            grace: None,
            closed: AtomicBool::new(false),
            hook: None,
            subscription: None,
        };
        window.action_performed()?;
        window.check_on_desktop()?;
        let ident = window.ident()?;
        window.services.session.register(&ident);
        window.grace = Some(GracePeriod::start(window.config.min_open_time()));
        debug!(element = %element, title = %ident.title, bounds = %ident.bounds, "window attached");
        Ok(window)
    }

    /// Mouse-driven actions can miss a window that hangs off the desktop. Only
    /// windows that can be minimized are expected to sit fully on screen.
    fn check_on_desktop(&self) -> Result<()> {
        let bounds = self.bounds()?;
        let desktop = self.services.accessibility.desktop_bounds()?;
        if desktop.contains(&bounds) {
            return Ok(());
        }
        let minimizable = match self.title_bar()? {
            Some(tb) => tb.minimize_button(&self.services)?.is_some(),
            None => false,
        };
        if minimizable {
            warn!(
                element = %self.element,
                bounds = %bounds,
                desktop = %desktop,
                "window is not fully inside the desktop; pointer actions may fail"
            );
        }
        Ok(())
    }

    /// The window element.
    pub fn element(&self) -> ElementRef {
        self.element
    }

    /// Collaborators this window talks to.
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Harness configuration in effect.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Custom readiness check run after the built-in stages, if installed.
    pub fn readiness_hook(&self) -> Option<&dyn ReadinessHook> {
        self.hook.as_deref()
    }

    /// Install a custom readiness check.
    pub fn set_readiness_hook(&mut self, hook: Arc<dyn ReadinessHook>) {
        self.hook = Some(hook);
    }

    /// Read one attribute of the window element.
    pub fn attribute(&self, attr: Attribute) -> Result<AttrValue> {
        self.services.accessibility.read_attribute(self.element, attr)
    }

    pub(crate) fn grace_period(&self) -> Option<&GracePeriod> {
        self.grace.as_ref()
    }

    pub(crate) fn is_marked_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_closed(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Record that an action was performed on the window: wait until it is
    /// ready for the next one.
    pub fn action_performed(&self) -> Result<()> {
        self.wait_while_busy()
    }

    /// Block until the window is ready for input. See [`crate::readiness`].
    pub fn wait_while_busy(&self) -> Result<()> {
        readiness::wait_while_busy(self)
    }

    /// Poll `check` until it holds or `timeout` (default: the busy timeout)
    /// elapses.
    pub fn wait_till<F>(&self, check: F, timeout: Option<Duration>) -> Result<()>
    where
        F: FnMut() -> bool,
    {
        let timeout = timeout.unwrap_or_else(|| self.config.busy_timeout());
        readiness::wait_till(&self.config, timeout, check)
    }

    /// Close the window. Repeated calls are no-ops.
    pub fn close(&self) -> Result<CloseOutcome> {
        close::close(self)
    }

    /// Current display state, derived from the native visual state.
    pub fn display_state(&self) -> Result<DisplayState> {
        display::display_state(self)
    }

    /// Move the window into `target`. Targets the window cannot reach
    /// (maximizing a fixed-size window) count as satisfied.
    pub fn set_display_state(&self, target: DisplayState) -> Result<()> {
        display::set_display_state(self, target)
    }

    /// Set the display state, then give the window keyboard focus.
    pub fn focus_with(&self, state: DisplayState) -> Result<()> {
        self.set_display_state(state)?;
        self.services.commands.focus(self.element)?;
        self.action_performed()
    }

    /// Window title: the title bar's name, or the element name when there is
    /// no title bar.
    pub fn title(&self) -> Result<String> {
        match self.title_bar()? {
            Some(tb) => tb.name(&self.services),
            None => self.attribute(Attribute::Name)?.into_text(Attribute::Name),
        }
    }

    /// Screen bounds of the window.
    pub fn bounds(&self) -> Result<Rect> {
        self.attribute(Attribute::BoundingRect)?
            .into_rect(Attribute::BoundingRect)
    }

    /// True once the window was closed through this handle, is offscreen, or
    /// can no longer be read.
    pub fn is_closed(&self) -> bool {
        if self.is_marked_closed() {
            return true;
        }
        match self
            .attribute(Attribute::IsOffscreen)
            .and_then(|v| v.into_bool(Attribute::IsOffscreen))
        {
            Ok(offscreen) => offscreen,
            Err(e) => {
                debug!(element = %self.element, error = %e, "window unreadable; treating as closed");
                true
            }
        }
    }

    /// Whether the window pattern reports the window as modal.
    pub fn is_modal(&self) -> Result<bool> {
        self.attribute(Attribute::IsModal)?
            .into_bool(Attribute::IsModal)
    }

    /// True when the window or one of its non-custom descendants has keyboard
    /// focus.
    pub fn is_currently_active(&self) -> Result<bool> {
        if self
            .attribute(Attribute::HasKeyboardFocus)?
            .into_bool(Attribute::HasKeyboardFocus)?
        {
            return Ok(true);
        }
        let access = &self.services.accessibility;
        for el in access.find_all_descendants(self.element, &Criteria::Any)? {
            let Some(control) = access
                .read_attribute(el, Attribute::ControlType)
                .and_then(|v| v.into_control(Attribute::ControlType))
                .benign()?
            else {
                continue;
            };
            if control == ControlType::Custom {
                continue;
            }
            let focused = access
                .read_attribute(el, Attribute::HasKeyboardFocus)
                .and_then(|v| v.into_bool(Attribute::HasKeyboardFocus))
                .benign()?;
            if focused == Some(true) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Window elements below this one (dialogs and other owned windows).
    pub fn modal_windows(&self) -> Result<Vec<ElementRef>> {
        self.services
            .accessibility
            .find_all_descendants(self.element, &Criteria::ControlType(ControlType::Window))
    }

    /// First MDI child matching `criteria`, searched over all descendants.
    pub fn mdi_child(&self, criteria: &Criteria) -> Result<Option<ElementRef>> {
        self.services
            .accessibility
            .find_descendant(self.element, criteria)
    }

    /// Subscribe to menu-opened events below this window. Subscribing twice
    /// returns the existing stream.
    pub fn hook_events(&mut self) -> Result<&Receiver<AutomationEvent>> {
        let sub = match self.subscription.take() {
            Some(sub) => sub,
            None => {
                let sub = self
                    .services
                    .accessibility
                    .subscribe(self.element, EventKind::MenuOpened)?;
                debug!(element = %self.element, id = sub.id, "subscribed to menu events");
                sub
            }
        };
        Ok(&self.subscription.insert(sub).events)
    }

    /// Drop the menu-opened subscription, if any.
    pub fn unhook_events(&mut self) -> Result<()> {
        if let Some(sub) = self.subscription.take() {
            self.services.accessibility.unsubscribe(&sub)?;
            debug!(element = %self.element, id = sub.id, "unsubscribed from menu events");
        }
        Ok(())
    }

    /// The window's title bar, if it has one.
    pub fn title_bar(&self) -> Result<Option<TitleBar>> {
        TitleBar::find(&self.services, self.element)
    }

    /// Snapshot handed to the session registry.
    pub fn ident(&self) -> Result<WindowIdent> {
        Ok(WindowIdent {
            element: self.element,
            title: self.title()?,
            bounds: self.bounds()?,
        })
    }

    /// Tell the session the window may have moved. Skipped when the window
    /// can no longer be read.
    pub(crate) fn notify_location_changed(&self) -> Result<()> {
        match self.ident().benign()? {
            Some(ident) => self.services.session.location_changed(&ident),
            None => debug!(element = %self.element, "window gone; skipping location update"),
        }
        Ok(())
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.title() {
            Ok(title) => f.write_str(&title),
            Err(_) => write!(f, "window {}", self.element),
        }
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        if let Err(e) = self.unhook_events() {
            debug!(element = %self.element, error = %e, "failed to unsubscribe on drop");
        }
        if self.grace.is_none() || self.config.keep_open_on_dispose() || self.is_marked_closed() {
            return;
        }
        if let Err(e) = self.close() {
            warn!(element = %self.element, error = %e, "failed to close window on drop");
        }
    }
}
