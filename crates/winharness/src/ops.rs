//! Collaborator interfaces consumed by the window core.
//!
//! The accessibility tree, the native window commands, process idling, the
//! pointer and the owning session are all external services. Providers map
//! their native failures into [`crate::Error`] variants (`Stale`,
//! `Unavailable`, `Automation`, `ProcessNotFound`) so raw provider codes never
//! reach harness callers.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    time::Duration,
};

use crossbeam_channel::Receiver;
use regex::Regex;

use crate::{
    error::{Error, Result},
    geom::Rect,
};

/// Opaque handle to a native automation element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRef(pub u64);

impl Display for ElementRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "#{}", self.0)
    }
}

/// Native visual-state code of a top-level window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VisualState(pub i32);

impl VisualState {
    pub const NORMAL: Self = Self(0);
    pub const MAXIMIZED: Self = Self(1);
    pub const MINIMIZED: Self = Self(2);
}

impl Display for VisualState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match *self {
            Self::NORMAL => write!(f, "Normal"),
            Self::MAXIMIZED => write!(f, "Maximized"),
            Self::MINIMIZED => write!(f, "Minimized"),
            Self(raw) => write!(f, "Unknown({raw})"),
        }
    }
}

/// Native responsiveness state of a top-level window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionState {
    /// Running normally.
    Running,
    /// In the process of closing.
    Closing,
    /// Ready for user interaction.
    ReadyForUserInteraction,
    /// Blocked by a modal window.
    BlockedByModalWindow,
    /// Not responding to input.
    NotResponding,
}

impl Display for InteractionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            Self::Running => "Running",
            Self::Closing => "Closing",
            Self::ReadyForUserInteraction => "ReadyForUserInteraction",
            Self::BlockedByModalWindow => "BlockedByModalWindow",
            Self::NotResponding => "NotResponding",
        };
        f.write_str(s)
    }
}

/// Identity of the pointer icon currently shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorId {
    /// Standard arrow.
    Arrow,
    /// Busy hourglass.
    Wait,
    /// Arrow with hourglass while an app starts.
    AppStarting,
    /// Text cursor.
    IBeam,
    /// Link hand.
    Hand,
    /// Provider-specific cursor handle.
    Other(u32),
}

/// Cursors that indicate the application is busy.
pub const WAIT_CURSORS: &[CursorId] = &[CursorId::Wait, CursorId::AppStarting];

impl CursorId {
    /// True for members of [`WAIT_CURSORS`].
    pub fn is_wait(self) -> bool {
        WAIT_CURSORS.contains(&self)
    }
}

impl Display for CursorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Other(id) => write!(f, "Other({id})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Control types the core needs to tell apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlType {
    /// Top-level or child window.
    Window,
    /// Window title bar.
    TitleBar,
    /// Push button.
    Button,
    /// Menu or menu bar.
    Menu,
    /// Status bar.
    StatusBar,
    /// Provider-defined control; ignored for focus checks.
    Custom,
    /// Anything else.
    Other,
}

/// Element search criteria understood by [`Accessibility`].
#[derive(Clone, Debug)]
pub enum Criteria {
    /// Match every element.
    Any,
    /// Match by control type.
    ControlType(ControlType),
    /// Match by automation id.
    AutomationId(String),
    /// Match by exact name.
    Name(String),
    /// Match names against a regular expression.
    NameMatches(Regex),
}

impl Criteria {
    /// Shorthand for [`Criteria::AutomationId`].
    pub fn automation_id(id: impl Into<String>) -> Self {
        Self::AutomationId(id.into())
    }

    /// Evaluate the criteria against element properties. Providers without a
    /// native query engine use this to filter candidates.
    pub fn matches(&self, control: ControlType, automation_id: &str, name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::ControlType(ct) => *ct == control,
            Self::AutomationId(id) => id == automation_id,
            Self::Name(n) => n == name,
            Self::NameMatches(re) => re.is_match(name),
        }
    }
}

/// Qualified attributes readable through [`Accessibility::read_attribute`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Display name.
    Name,
    /// Native class name.
    ClassName,
    /// Automation id.
    AutomationId,
    /// Control type.
    ControlType,
    /// Owning process id.
    ProcessId,
    /// Whether the element is off screen.
    IsOffscreen,
    /// Screen bounds.
    BoundingRect,
    /// Whether the element has keyboard focus.
    HasKeyboardFocus,
    /// Window pattern: current visual state.
    VisualState,
    /// Window pattern: current interaction state.
    InteractionState,
    /// Window pattern: whether the window can be maximized.
    CanMaximize,
    /// Window pattern: whether the window can be minimized.
    CanMinimize,
    /// Window pattern: whether the window is modal.
    IsModal,
}

/// Attribute value returned by a provider.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// String attribute.
    Text(String),
    /// Integer attribute.
    Int(i64),
    /// Boolean attribute.
    Bool(bool),
    /// Bounds.
    Rect(Rect),
    /// Control type.
    Control(ControlType),
    /// Window visual state.
    Visual(VisualState),
    /// Window interaction state.
    Interaction(InteractionState),
}

impl AttrValue {
    /// Short kind name used in type-mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Int(_) => "integer",
            Self::Bool(_) => "boolean",
            Self::Rect(_) => "rect",
            Self::Control(_) => "control-type",
            Self::Visual(_) => "visual-state",
            Self::Interaction(_) => "interaction-state",
        }
    }

    fn mismatch(&self, attr: Attribute) -> Error {
        Error::AttributeType {
            attr,
            got: self.kind(),
        }
    }

    pub fn into_text(self, attr: Attribute) -> Result<String> {
        match self {
            Self::Text(s) => Ok(s),
            other => Err(other.mismatch(attr)),
        }
    }

    pub fn into_bool(self, attr: Attribute) -> Result<bool> {
        match self {
            Self::Bool(b) => Ok(b),
            other => Err(other.mismatch(attr)),
        }
    }

    pub fn into_int(self, attr: Attribute) -> Result<i64> {
        match self {
            Self::Int(i) => Ok(i),
            other => Err(other.mismatch(attr)),
        }
    }

    pub fn into_rect(self, attr: Attribute) -> Result<Rect> {
        match self {
            Self::Rect(r) => Ok(r),
            other => Err(other.mismatch(attr)),
        }
    }

    pub fn into_control(self, attr: Attribute) -> Result<ControlType> {
        match self {
            Self::Control(c) => Ok(c),
            other => Err(other.mismatch(attr)),
        }
    }

    pub fn into_visual(self, attr: Attribute) -> Result<VisualState> {
        match self {
            Self::Visual(v) => Ok(v),
            other => Err(other.mismatch(attr)),
        }
    }

    pub fn into_interaction(self, attr: Attribute) -> Result<InteractionState> {
        match self {
            Self::Interaction(s) => Ok(s),
            other => Err(other.mismatch(attr)),
        }
    }
}

/// Automation events a window can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// A menu opened somewhere below the subscribed element.
    MenuOpened,
}

/// Event delivered to a [`Subscription`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutomationEvent {
    /// What happened.
    pub kind: EventKind,
    /// Element that raised the event.
    pub source: ElementRef,
}

/// Live event subscription handed out by [`Accessibility::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    /// Provider-assigned subscription id.
    pub id: u64,
    /// Event kind subscribed to.
    pub kind: EventKind,
    /// Receiving side of the event stream.
    pub events: Receiver<AutomationEvent>,
}

/// Accessibility tree queries.
pub trait Accessibility: Send + Sync {
    /// First descendant of `root` matching `criteria`.
    fn find_descendant(&self, root: ElementRef, criteria: &Criteria) -> Result<Option<ElementRef>>;
    /// All descendants of `root` matching `criteria`.
    fn find_all_descendants(&self, root: ElementRef, criteria: &Criteria)
    -> Result<Vec<ElementRef>>;
    /// Read one qualified attribute of `element`.
    fn read_attribute(&self, element: ElementRef, attr: Attribute) -> Result<AttrValue>;
    /// Bounds of the whole desktop.
    fn desktop_bounds(&self) -> Result<Rect>;
    /// Subscribe to `kind` events raised by descendants of `element`.
    fn subscribe(&self, element: ElementRef, kind: EventKind) -> Result<Subscription>;
    /// Drop a subscription created by [`Accessibility::subscribe`].
    fn unsubscribe(&self, subscription: &Subscription) -> Result<()>;
}

/// Native window-pattern commands.
pub trait WindowCommands: Send + Sync {
    /// Issue the native close command.
    fn close(&self, window: ElementRef) -> Result<()>;
    /// Set the native visual state.
    fn set_visual_state(&self, window: ElementRef, state: VisualState) -> Result<()>;
    /// Wait for the window's message loop to go idle. `Ok(false)` on timeout.
    fn wait_for_input_idle(&self, window: ElementRef, timeout: Duration) -> Result<bool>;
    /// Invoke (click) a control such as a title-bar button.
    fn invoke(&self, control: ElementRef) -> Result<()>;
    /// Give keyboard focus to an element.
    fn focus(&self, element: ElementRef) -> Result<()>;
}

/// Process-level services.
pub trait ProcessService: Send + Sync {
    /// Block until the process is idle. Fails with
    /// [`Error::ProcessNotFound`] when the process has exited.
    fn wait_for_input_idle(&self, pid: u32) -> Result<()>;
}

/// Pointer (mouse) services.
pub trait PointerService: Send + Sync {
    /// Identity of the pointer icon currently displayed.
    fn current_cursor(&self) -> Result<CursorId>;
    /// Move the pointer slightly so the provider refreshes the cursor shape.
    fn nudge(&self) -> Result<()>;
}

/// Snapshot of a window handed to the session registry.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowIdent {
    /// Element backing the window.
    pub element: ElementRef,
    /// Title at the time of the snapshot.
    pub title: String,
    /// Bounds at the time of the snapshot.
    pub bounds: Rect,
}

/// Session-level tracking of windows.
pub trait SessionRegistry: Send + Sync {
    /// Start tracking a newly attached window.
    fn register(&self, window: &WindowIdent);
    /// The window's location or size may have changed.
    fn location_changed(&self, window: &WindowIdent);
}
