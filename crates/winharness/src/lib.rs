//! winharness: the window lifecycle core of a UI test harness.
//!
//! A [`Window`] wraps one top-level native window and owns the protocols a
//! harness needs around it:
//!
//! - readiness detection ("wait while busy") before and after every action,
//! - a close handshake that prefers the title-bar close button, falls back to
//!   the native close command and honours a minimum-lifetime grace period,
//! - display-state transitions (restored, minimized, maximized) that tolerate
//!   providers which only partly honour the native setter.
//!
//! Everything platform specific sits behind the traits in [`ops`]. The
//! [`mock::MockDesktop`] provider implements all of them in memory.

pub mod close;
pub mod display;
mod error;
pub mod geom;
pub mod mock;
pub mod observability;
pub mod ops;
pub mod readiness;
pub mod retry;
pub mod services;
pub mod title_bar;
pub mod window;

pub use close::{CLOSE_RETRY_DELAY, CloseOutcome, GracePeriod};
pub use config::HarnessConfig;
pub use display::{DISPLAY_STATE_TABLE, DisplayState};
pub use error::{BUSY_HINT, Error, Result, ResultExt};
pub use geom::Rect;
pub use ops::{
    Accessibility, AttrValue, Attribute, AutomationEvent, ControlType, Criteria, CursorId,
    ElementRef, EventKind, InteractionState, PointerService, ProcessService, SessionRegistry,
    Subscription, VisualState, WindowCommands, WindowIdent,
};
pub use readiness::ReadinessHook;
pub use retry::{Polled, RetryPolicy, poll_until, retry_until};
pub use services::Services;
pub use title_bar::TitleBar;
pub use window::Window;
