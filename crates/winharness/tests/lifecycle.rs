use std::{
    io::{self, Write},
    sync::Arc,
};

use parking_lot::Mutex;
use regex::Regex;
use tracing_subscriber::fmt::MakeWriter;
use winharness::{
    ControlType, Criteria, ElementRef, EventKind, HarnessConfig, Rect, Window, mock::MockDesktop,
    title_bar::MINIMIZE_BUTTON_ID,
};

fn config(keep_open: bool) -> Arc<HarnessConfig> {
    Arc::new(HarnessConfig {
        busy_timeout_ms: 200,
        poll_interval_ms: 10,
        min_open_time_ms: 0,
        keep_open_on_dispose: keep_open,
        ..HarnessConfig::default()
    })
}

fn attach(mock: &Arc<MockDesktop>) -> Window {
    Window::attach(MockDesktop::WINDOW, mock.services(), config(false)).unwrap()
}

/// Captures formatted log output for assertions.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn attach_capturing_logs(mock: &Arc<MockDesktop>) -> String {
    let buf = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buf.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        Window::attach(MockDesktop::WINDOW, mock.services(), config(true)).unwrap();
    });
    buf.contents()
}

#[test]
fn attach_registers_with_session() {
    let mock = Arc::new(MockDesktop::new());
    let w = attach(&mock);
    let registered = mock.registered();
    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0].element, MockDesktop::WINDOW);
    assert_eq!(registered[0].title, "Untitled - Notepad");
    assert_eq!(w.to_string(), "Untitled - Notepad");
}

#[test]
fn off_desktop_window_warns_only_when_minimizable() {
    let mock = Arc::new(MockDesktop::new());
    mock.set_bounds(Rect::new(1800.0, 100.0, 800.0, 600.0));
    let logs = attach_capturing_logs(&mock);
    assert!(logs.contains("not fully inside the desktop"), "{logs}");

    let mock = Arc::new(MockDesktop::new());
    mock.set_bounds(Rect::new(1800.0, 100.0, 800.0, 600.0));
    mock.remove_button(MINIMIZE_BUTTON_ID);
    let logs = attach_capturing_logs(&mock);
    assert!(!logs.contains("not fully inside the desktop"), "{logs}");
}

#[test]
fn drop_closes_window() {
    let mock = Arc::new(MockDesktop::new());
    drop(attach(&mock));
    assert!(mock.calls_contains("invoke:#3"));
    assert!(mock.is_gone());
}

#[test]
fn drop_keeps_window_open_when_configured() {
    let mock = Arc::new(MockDesktop::new());
    drop(Window::attach(MockDesktop::WINDOW, mock.services(), config(true)).unwrap());
    assert!(!mock.calls_contains("invoke:#3"));
    assert!(!mock.calls_contains("close"));
}

#[test]
fn drop_after_external_close_does_not_panic() {
    let mock = Arc::new(MockDesktop::new());
    let w = attach(&mock);
    mock.set_gone(true);
    assert!(w.is_closed());
    drop(w);
}

#[test]
fn failed_attach_does_not_close() {
    let mock = Arc::new(MockDesktop::new());
    mock.set_process_exited(true);
    assert!(Window::attach(MockDesktop::WINDOW, mock.services(), config(false)).is_err());
    assert!(!mock.calls_contains("invoke:#3"));
    assert!(!mock.calls_contains("close"));
}

#[test]
fn closed_state_tracks_offscreen_and_close() {
    let mock = Arc::new(MockDesktop::new());
    let w = attach(&mock);
    assert!(!w.is_closed());
    mock.set_offscreen(true);
    assert!(w.is_closed());
    mock.set_offscreen(false);
    w.close().unwrap();
    assert!(w.is_closed());
}

#[test]
fn title_falls_back_to_element_name() {
    let mock = Arc::new(MockDesktop::new());
    mock.set_title_bar(false);
    mock.set_title("Console");
    let w = attach(&mock);
    assert_eq!(w.title().unwrap(), "Console");
    assert!(w.title_bar().unwrap().is_none());
}

#[test]
fn modal_windows_lists_every_child_window() {
    let mock = Arc::new(MockDesktop::new());
    let save = mock.add_child_window("Save As", "SaveDialog", true);
    let find = mock.add_child_window("Find", "FindDialog", false);
    mock.add_child("editor", "Edit", ControlType::Other, false);
    let w = attach(&mock);
    assert_eq!(w.modal_windows().unwrap(), vec![save, find]);
    assert!(!w.is_modal().unwrap());
}

#[test]
fn mdi_child_matches_criteria() {
    let mock = Arc::new(MockDesktop::new());
    mock.add_child_window("report.txt", "Doc1", false);
    let second = mock.add_child_window("notes.md", "Doc2", false);
    let w = attach(&mock);
    let re = Criteria::NameMatches(Regex::new(r"\.md$").unwrap());
    assert_eq!(w.mdi_child(&re).unwrap(), Some(second));
    assert_eq!(w.mdi_child(&Criteria::automation_id("Doc2")).unwrap(), Some(second));
    assert_eq!(w.mdi_child(&Criteria::Name("missing".into())).unwrap(), None);
}

#[test]
fn mdi_child_finds_documents_that_are_not_windows() {
    let mock = Arc::new(MockDesktop::new());
    let doc = mock.add_child("doc.txt", "MdiDoc", ControlType::Other, false);
    let w = attach(&mock);
    assert_eq!(w.mdi_child(&Criteria::automation_id("MdiDoc")).unwrap(), Some(doc));
}

#[test]
fn focus_on_custom_controls_does_not_count() {
    let mock = Arc::new(MockDesktop::new());
    let custom = mock.add_child("canvas", "Canvas", ControlType::Custom, false);
    let edit = mock.add_child("editor", "Edit", ControlType::Other, false);
    let w = attach(&mock);
    assert!(!w.is_currently_active().unwrap());
    mock.set_child_focused(custom, true);
    assert!(!w.is_currently_active().unwrap());
    mock.set_child_focused(edit, true);
    assert!(w.is_currently_active().unwrap());
}

#[test]
fn menu_events_flow_until_unhooked() {
    let mock = Arc::new(MockDesktop::new());
    let mut w = attach(&mock);
    let events = w.hook_events().unwrap().clone();
    // Hooking twice reuses the subscription.
    w.hook_events().unwrap();
    assert_eq!(mock.subscription_count(), 1);

    mock.emit_menu_opened(ElementRef(55));
    let ev = events.try_recv().unwrap();
    assert_eq!(ev.kind, EventKind::MenuOpened);
    assert_eq!(ev.source, ElementRef(55));

    w.unhook_events().unwrap();
    assert_eq!(mock.subscription_count(), 0);
}

#[test]
fn drop_unsubscribes() {
    let mock = Arc::new(MockDesktop::new());
    let mut w = Window::attach(MockDesktop::WINDOW, mock.services(), config(true)).unwrap();
    w.hook_events().unwrap();
    drop(w);
    assert_eq!(mock.subscription_count(), 0);
}
