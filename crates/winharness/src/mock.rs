//! Scripted in-memory desktop for tests and the smoketest runner.
//!
//! `MockDesktop` plays every collaborator role at once: one top-level window
//! with an optional title bar and buttons, optional child windows, scripted
//! failures and a timestamped call log.

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
    time::{Duration, Instant},
};

use crossbeam_channel::{Sender, unbounded};
use parking_lot::Mutex;

use crate::{
    error::{Error, Result},
    geom::Rect,
    ops::{
        Accessibility, AttrValue, Attribute, AutomationEvent, ControlType, Criteria, CursorId,
        ElementRef, EventKind, InteractionState, PointerService, ProcessService, SessionRegistry,
        Subscription, VisualState, WindowCommands, WindowIdent,
    },
    services::Services,
    title_bar::{CLOSE_BUTTON_ID, MAXIMIZE_BUTTON_ID, MINIMIZE_BUTTON_ID, RESTORE_BUTTON_ID},
};

const FIRST_CHILD_ID: u64 = 100;

struct Node {
    element: ElementRef,
    parent: ElementRef,
    control: ControlType,
    automation_id: String,
    name: String,
}

#[derive(Clone)]
struct Child {
    element: ElementRef,
    name: String,
    automation_id: String,
    control: ControlType,
    modal: bool,
    focused: bool,
}

struct State {
    calls: Vec<(Instant, String)>,
    title: String,
    class_name: String,
    pid: i64,
    bounds: Rect,
    desktop: Rect,
    visual: VisualState,
    honour_visual_setter: bool,
    can_maximize: bool,
    can_minimize: bool,
    modal: bool,
    offscreen: bool,
    focused: bool,
    gone: bool,
    title_bar: bool,
    buttons: Vec<&'static str>,
    children: Vec<Child>,
    invoke_errors: VecDeque<Error>,
    close_errors: VecDeque<Error>,
    attribute_errors: HashMap<Attribute, VecDeque<Error>>,
    interaction: VecDeque<InteractionState>,
    cursors: VecDeque<CursorId>,
    process_exited: bool,
    window_idle: bool,
    registered: Vec<WindowIdent>,
    subscribers: Vec<(u64, Sender<AutomationEvent>)>,
    next_subscription: u64,
}

impl State {
    fn note(&mut self, s: impl Into<String>) {
        self.calls.push((Instant::now(), s.into()));
    }

    fn nodes(&self) -> Vec<Node> {
        let mut out = Vec::new();
        if self.title_bar {
            out.push(Node {
                element: MockDesktop::TITLE_BAR,
                parent: MockDesktop::WINDOW,
                control: ControlType::TitleBar,
                automation_id: "TitleBar".into(),
                name: self.title.clone(),
            });
            for id in &self.buttons {
                out.push(Node {
                    element: MockDesktop::button(id),
                    parent: MockDesktop::TITLE_BAR,
                    control: ControlType::Button,
                    automation_id: (*id).into(),
                    name: (*id).into(),
                });
            }
        }
        for c in &self.children {
            out.push(Node {
                element: c.element,
                parent: MockDesktop::WINDOW,
                control: c.control,
                automation_id: c.automation_id.clone(),
                name: c.name.clone(),
            });
        }
        out
    }

    fn descendants(&self, root: ElementRef, criteria: &Criteria) -> Vec<ElementRef> {
        let nodes = self.nodes();
        let is_below = |mut el: ElementRef| {
            while let Some(n) = nodes.iter().find(|n| n.element == el) {
                if n.parent == root {
                    return true;
                }
                el = n.parent;
            }
            false
        };
        nodes
            .iter()
            .filter(|n| is_below(n.element))
            .filter(|n| criteria.matches(n.control, &n.automation_id, &n.name))
            .map(|n| n.element)
            .collect()
    }

    /// Pop the next scripted value, keeping the last one sticky.
    fn next_scripted<T: Copy>(queue: &mut VecDeque<T>, fallback: T) -> T {
        if queue.len() > 1 {
            queue.pop_front().unwrap_or(fallback)
        } else {
            queue.front().copied().unwrap_or(fallback)
        }
    }

    fn window_attribute(&mut self, attr: Attribute) -> AttrValue {
        match attr {
            Attribute::Name => AttrValue::Text(self.title.clone()),
            Attribute::ClassName => AttrValue::Text(self.class_name.clone()),
            Attribute::AutomationId => AttrValue::Text(String::new()),
            Attribute::ControlType => AttrValue::Control(ControlType::Window),
            Attribute::ProcessId => AttrValue::Int(self.pid),
            Attribute::IsOffscreen => AttrValue::Bool(self.offscreen),
            Attribute::BoundingRect => AttrValue::Rect(self.bounds),
            Attribute::HasKeyboardFocus => AttrValue::Bool(self.focused),
            Attribute::VisualState => AttrValue::Visual(self.visual),
            Attribute::InteractionState => AttrValue::Interaction(Self::next_scripted(
                &mut self.interaction,
                InteractionState::Running,
            )),
            Attribute::CanMaximize => AttrValue::Bool(self.can_maximize),
            Attribute::CanMinimize => AttrValue::Bool(self.can_minimize),
            Attribute::IsModal => AttrValue::Bool(self.modal),
        }
    }

    fn node_attribute(&self, element: ElementRef, attr: Attribute) -> Result<AttrValue> {
        let nodes = self.nodes();
        let node = nodes
            .iter()
            .find(|n| n.element == element)
            .ok_or(Error::Stale)?;
        let child = self.children.iter().find(|c| c.element == element);
        Ok(match attr {
            Attribute::Name => AttrValue::Text(node.name.clone()),
            Attribute::AutomationId => AttrValue::Text(node.automation_id.clone()),
            Attribute::ControlType => AttrValue::Control(node.control),
            Attribute::HasKeyboardFocus => AttrValue::Bool(child.is_some_and(|c| c.focused)),
            Attribute::IsModal => AttrValue::Bool(child.is_some_and(|c| c.modal)),
            Attribute::IsOffscreen => AttrValue::Bool(false),
            _ => return Err(Error::Automation(format!("{attr:?} not supported on {element}"))),
        })
    }
}

/// In-memory desktop hosting one scripted top-level window.
pub struct MockDesktop {
    state: Mutex<State>,
}

impl Default for MockDesktop {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDesktop {
    /// The scripted top-level window.
    pub const WINDOW: ElementRef = ElementRef(1);
    /// Its title bar.
    pub const TITLE_BAR: ElementRef = ElementRef(2);
    /// Title-bar buttons.
    pub const CLOSE_BUTTON: ElementRef = ElementRef(3);
    pub const MINIMIZE_BUTTON: ElementRef = ElementRef(4);
    pub const MAXIMIZE_BUTTON: ElementRef = ElementRef(5);
    pub const RESTORE_BUTTON: ElementRef = ElementRef(6);

    /// A responsive, restored, on-screen window with a full title bar.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                calls: Vec::new(),
                title: "Untitled - Notepad".into(),
                class_name: "Notepad".into(),
                pid: 4242,
                bounds: Rect::new(100.0, 100.0, 800.0, 600.0),
                desktop: Rect::new(0.0, 0.0, 1920.0, 1080.0),
                visual: VisualState::NORMAL,
                honour_visual_setter: true,
                can_maximize: true,
                can_minimize: true,
                modal: false,
                offscreen: false,
                focused: false,
                gone: false,
                title_bar: true,
                buttons: vec![
                    MINIMIZE_BUTTON_ID,
                    MAXIMIZE_BUTTON_ID,
                    RESTORE_BUTTON_ID,
                    CLOSE_BUTTON_ID,
                ],
                children: Vec::new(),
                invoke_errors: VecDeque::new(),
                close_errors: VecDeque::new(),
                attribute_errors: HashMap::new(),
                interaction: VecDeque::new(),
                cursors: VecDeque::new(),
                process_exited: false,
                window_idle: true,
                registered: Vec::new(),
                subscribers: Vec::new(),
                next_subscription: 1,
            }),
        }
    }

    fn button(id: &str) -> ElementRef {
        match id {
            CLOSE_BUTTON_ID => Self::CLOSE_BUTTON,
            MINIMIZE_BUTTON_ID => Self::MINIMIZE_BUTTON,
            MAXIMIZE_BUTTON_ID => Self::MAXIMIZE_BUTTON,
            _ => Self::RESTORE_BUTTON,
        }
    }

    /// Collaborator bundle backed by this desktop.
    pub fn services(self: &Arc<Self>) -> Services {
        Services::from_provider(self.clone())
    }

    pub fn set_title(&self, title: &str) {
        self.state.lock().title = title.to_string();
    }

    pub fn set_class_name(&self, class: &str) {
        self.state.lock().class_name = class.to_string();
    }

    pub fn set_bounds(&self, bounds: Rect) {
        self.state.lock().bounds = bounds;
    }

    pub fn set_visual(&self, visual: VisualState) {
        self.state.lock().visual = visual;
    }

    pub fn visual(&self) -> VisualState {
        self.state.lock().visual
    }

    /// When false, `set_visual_state` is logged but has no effect.
    pub fn set_honour_visual_setter(&self, v: bool) {
        self.state.lock().honour_visual_setter = v;
    }

    pub fn set_can_maximize(&self, v: bool) {
        self.state.lock().can_maximize = v;
    }

    pub fn set_can_minimize(&self, v: bool) {
        self.state.lock().can_minimize = v;
    }

    pub fn set_modal(&self, v: bool) {
        self.state.lock().modal = v;
    }

    pub fn set_offscreen(&self, v: bool) {
        self.state.lock().offscreen = v;
    }

    pub fn set_focused(&self, v: bool) {
        self.state.lock().focused = v;
    }

    /// Make every read of the window fail as unavailable.
    pub fn set_gone(&self, v: bool) {
        self.state.lock().gone = v;
    }

    pub fn is_gone(&self) -> bool {
        self.state.lock().gone
    }

    pub fn set_title_bar(&self, present: bool) {
        self.state.lock().title_bar = present;
    }

    /// Remove one title-bar button by automation id.
    pub fn remove_button(&self, id: &str) {
        self.state.lock().buttons.retain(|b| *b != id);
    }

    /// Add a child window and return its element.
    pub fn add_child_window(&self, name: &str, automation_id: &str, modal: bool) -> ElementRef {
        self.add_child(name, automation_id, ControlType::Window, modal)
    }

    /// Add a non-window child control and return its element.
    pub fn add_child(
        &self,
        name: &str,
        automation_id: &str,
        control: ControlType,
        modal: bool,
    ) -> ElementRef {
        let mut s = self.state.lock();
        let element = ElementRef(FIRST_CHILD_ID + s.children.len() as u64);
        s.children.push(Child {
            element,
            name: name.to_string(),
            automation_id: automation_id.to_string(),
            control,
            modal,
            focused: false,
        });
        element
    }

    pub fn set_child_focused(&self, element: ElementRef, focused: bool) {
        let mut s = self.state.lock();
        for c in s.children.iter_mut().filter(|c| c.element == element) {
            c.focused = focused;
        }
    }

    /// Fail the next `invoke` with `err`. Queued errors are consumed in order.
    pub fn push_invoke_error(&self, err: Error) {
        self.state.lock().invoke_errors.push_back(err);
    }

    /// Fail the next native `close` with `err`.
    pub fn push_close_error(&self, err: Error) {
        self.state.lock().close_errors.push_back(err);
    }

    /// Fail the next read of `attr` on the window with `err`.
    pub fn push_attribute_error(&self, attr: Attribute, err: Error) {
        self.state
            .lock()
            .attribute_errors
            .entry(attr)
            .or_default()
            .push_back(err);
    }

    /// Interaction states returned by successive reads; the last one sticks.
    pub fn script_interaction(&self, states: &[InteractionState]) {
        self.state.lock().interaction = states.iter().copied().collect();
    }

    /// Cursors returned by successive reads; the last one sticks.
    pub fn script_cursors(&self, cursors: &[CursorId]) {
        self.state.lock().cursors = cursors.iter().copied().collect();
    }

    pub fn set_process_exited(&self, v: bool) {
        self.state.lock().process_exited = v;
    }

    /// Result of the native window-idle wait.
    pub fn set_window_idle(&self, v: bool) {
        self.state.lock().window_idle = v;
    }

    /// Windows registered with the session so far.
    pub fn registered(&self) -> Vec<WindowIdent> {
        self.state.lock().registered.clone()
    }

    /// Deliver a menu-opened event to every live subscription. Returns how
    /// many subscriptions received it.
    pub fn emit_menu_opened(&self, source: ElementRef) -> usize {
        let s = self.state.lock();
        s.subscribers
            .iter()
            .filter(|(_, tx)| {
                tx.send(AutomationEvent {
                    kind: EventKind::MenuOpened,
                    source,
                })
                .is_ok()
            })
            .count()
    }

    pub fn subscription_count(&self) -> usize {
        self.state.lock().subscribers.len()
    }

    /// Every call recorded so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn calls_contains(&self, s: &str) -> bool {
        self.state.lock().calls.iter().any(|(_, c)| c == s)
    }

    pub fn call_count(&self, s: &str) -> usize {
        self.state.lock().calls.iter().filter(|(_, c)| c == s).count()
    }

    /// Time of the first call named `s`.
    pub fn first_call_at(&self, s: &str) -> Option<Instant> {
        self.state
            .lock()
            .calls
            .iter()
            .find(|(_, c)| c == s)
            .map(|(at, _)| *at)
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }
}

impl Accessibility for MockDesktop {
    fn find_descendant(&self, root: ElementRef, criteria: &Criteria) -> Result<Option<ElementRef>> {
        let s = self.state.lock();
        if s.gone {
            return Err(Error::Unavailable);
        }
        Ok(s.descendants(root, criteria).into_iter().next())
    }

    fn find_all_descendants(
        &self,
        root: ElementRef,
        criteria: &Criteria,
    ) -> Result<Vec<ElementRef>> {
        let s = self.state.lock();
        if s.gone {
            return Err(Error::Unavailable);
        }
        Ok(s.descendants(root, criteria))
    }

    fn read_attribute(&self, element: ElementRef, attr: Attribute) -> Result<AttrValue> {
        let mut s = self.state.lock();
        if s.gone {
            return Err(Error::Unavailable);
        }
        if element != Self::WINDOW {
            return s.node_attribute(element, attr);
        }
        if let Some(err) = s.attribute_errors.get_mut(&attr).and_then(VecDeque::pop_front) {
            return Err(err);
        }
        Ok(s.window_attribute(attr))
    }

    fn desktop_bounds(&self) -> Result<Rect> {
        Ok(self.state.lock().desktop)
    }

    fn subscribe(&self, element: ElementRef, kind: EventKind) -> Result<Subscription> {
        let mut s = self.state.lock();
        if s.gone {
            return Err(Error::Unavailable);
        }
        s.note(format!("subscribe:{element}"));
        let id = s.next_subscription;
        s.next_subscription += 1;
        let (tx, rx) = unbounded();
        s.subscribers.push((id, tx));
        Ok(Subscription {
            id,
            kind,
            events: rx,
        })
    }

    fn unsubscribe(&self, subscription: &Subscription) -> Result<()> {
        let mut s = self.state.lock();
        s.note(format!("unsubscribe:{}", subscription.id));
        s.subscribers.retain(|(id, _)| *id != subscription.id);
        Ok(())
    }
}

impl WindowCommands for MockDesktop {
    fn close(&self, _window: ElementRef) -> Result<()> {
        let mut s = self.state.lock();
        s.note("close");
        if let Some(err) = s.close_errors.pop_front() {
            return Err(err);
        }
        s.gone = true;
        Ok(())
    }

    fn set_visual_state(&self, _window: ElementRef, state: VisualState) -> Result<()> {
        let mut s = self.state.lock();
        s.note(format!("set_visual_state:{state}"));
        if s.gone {
            return Err(Error::Unavailable);
        }
        if s.honour_visual_setter {
            s.visual = state;
        }
        Ok(())
    }

    fn wait_for_input_idle(&self, _window: ElementRef, _timeout: Duration) -> Result<bool> {
        let mut s = self.state.lock();
        s.note("window_idle");
        Ok(s.window_idle)
    }

    fn invoke(&self, control: ElementRef) -> Result<()> {
        let mut s = self.state.lock();
        s.note(format!("invoke:{control}"));
        if let Some(err) = s.invoke_errors.pop_front() {
            return Err(err);
        }
        match control {
            Self::CLOSE_BUTTON => s.gone = true,
            Self::MINIMIZE_BUTTON => s.visual = VisualState::MINIMIZED,
            Self::MAXIMIZE_BUTTON => {
                s.visual = if s.visual == VisualState::MAXIMIZED {
                    VisualState::NORMAL
                } else {
                    VisualState::MAXIMIZED
                };
            }
            Self::RESTORE_BUTTON => s.visual = VisualState::NORMAL,
            _ => {}
        }
        Ok(())
    }

    fn focus(&self, element: ElementRef) -> Result<()> {
        let mut s = self.state.lock();
        s.note(format!("focus:{element}"));
        if element == Self::WINDOW {
            s.focused = true;
        }
        Ok(())
    }
}

impl ProcessService for MockDesktop {
    fn wait_for_input_idle(&self, pid: u32) -> Result<()> {
        let mut s = self.state.lock();
        s.note(format!("process_idle:{pid}"));
        if s.process_exited {
            return Err(Error::ProcessNotFound(pid));
        }
        Ok(())
    }
}

impl PointerService for MockDesktop {
    fn current_cursor(&self) -> Result<CursorId> {
        let mut s = self.state.lock();
        Ok(State::next_scripted(&mut s.cursors, CursorId::Arrow))
    }

    fn nudge(&self) -> Result<()> {
        self.state.lock().note("nudge");
        Ok(())
    }
}

impl SessionRegistry for MockDesktop {
    fn register(&self, window: &WindowIdent) {
        let mut s = self.state.lock();
        s.note("register");
        s.registered.push(window.clone());
    }

    fn location_changed(&self, _window: &WindowIdent) {
        self.state.lock().note("location_changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_bar_buttons_resolve_below_title_bar() {
        let m = MockDesktop::new();
        let close = m
            .find_descendant(MockDesktop::TITLE_BAR, &Criteria::automation_id(CLOSE_BUTTON_ID))
            .unwrap();
        assert_eq!(close, Some(MockDesktop::CLOSE_BUTTON));
        let tb = m
            .find_descendant(
                MockDesktop::WINDOW,
                &Criteria::ControlType(ControlType::TitleBar),
            )
            .unwrap();
        assert_eq!(tb, Some(MockDesktop::TITLE_BAR));

        m.remove_button(CLOSE_BUTTON_ID);
        let close = m
            .find_descendant(MockDesktop::TITLE_BAR, &Criteria::automation_id(CLOSE_BUTTON_ID))
            .unwrap();
        assert_eq!(close, None);
    }

    #[test]
    fn scripted_interaction_last_value_sticks() {
        let m = MockDesktop::new();
        m.script_interaction(&[InteractionState::NotResponding, InteractionState::Running]);
        let read = || {
            m.read_attribute(MockDesktop::WINDOW, Attribute::InteractionState)
                .unwrap()
        };
        assert_eq!(read(), AttrValue::Interaction(InteractionState::NotResponding));
        assert_eq!(read(), AttrValue::Interaction(InteractionState::Running));
        assert_eq!(read(), AttrValue::Interaction(InteractionState::Running));
    }

    #[test]
    fn native_close_makes_window_unavailable() {
        let m = MockDesktop::new();
        m.close(MockDesktop::WINDOW).unwrap();
        assert!(m.calls_contains("close"));
        assert!(matches!(
            m.read_attribute(MockDesktop::WINDOW, Attribute::Name),
            Err(Error::Unavailable)
        ));
    }

    #[test]
    fn events_reach_live_subscriptions_only() {
        let m = MockDesktop::new();
        let sub = m
            .subscribe(MockDesktop::WINDOW, EventKind::MenuOpened)
            .unwrap();
        assert_eq!(m.emit_menu_opened(ElementRef(77)), 1);
        assert_eq!(sub.events.try_recv().unwrap().source, ElementRef(77));
        m.unsubscribe(&sub).unwrap();
        assert_eq!(m.emit_menu_opened(ElementRef(77)), 0);
    }
}
