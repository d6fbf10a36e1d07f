use std::sync::Arc;

use winharness::{
    DisplayState, Error, HarnessConfig, VisualState, Window, mock::MockDesktop,
    title_bar::RESTORE_BUTTON_ID,
};

fn attach(mock: &Arc<MockDesktop>) -> Window {
    let cfg = HarnessConfig {
        busy_timeout_ms: 200,
        poll_interval_ms: 10,
        keep_open_on_dispose: true,
        ..HarnessConfig::default()
    };
    Window::attach(MockDesktop::WINDOW, mock.services(), Arc::new(cfg)).unwrap()
}

fn setter_calls(mock: &MockDesktop) -> usize {
    mock.calls()
        .iter()
        .filter(|c| c.starts_with("set_visual_state"))
        .count()
}

#[test]
fn setting_the_current_state_is_a_no_op() {
    let mock = Arc::new(MockDesktop::new());
    let w = attach(&mock);
    for state in DisplayState::ALL {
        mock.set_visual(state.visual());
        mock.clear_calls();
        w.set_display_state(state).unwrap();
        assert_eq!(setter_calls(&mock), 0, "{state}");
        assert!(!mock.calls_contains("location_changed"));
    }
}

#[test]
fn maximize_is_satisfied_when_window_cannot_maximize() {
    let mock = Arc::new(MockDesktop::new());
    mock.set_can_maximize(false);
    let w = attach(&mock);
    w.set_display_state(DisplayState::Maximized).unwrap();
    assert_eq!(w.display_state().unwrap(), DisplayState::Restored);
    assert_eq!(setter_calls(&mock), 0);
}

#[test]
fn minimize_is_satisfied_when_window_cannot_minimize() {
    let mock = Arc::new(MockDesktop::new());
    mock.set_can_minimize(false);
    let w = attach(&mock);
    w.set_display_state(DisplayState::Minimized).unwrap();
    assert_eq!(mock.visual(), VisualState::NORMAL);
    assert_eq!(setter_calls(&mock), 0);
}

#[test]
fn unmapped_visual_state_is_fatal() {
    let mock = Arc::new(MockDesktop::new());
    let w = attach(&mock);
    mock.set_visual(VisualState(7));
    let err = w.display_state().unwrap_err();
    assert!(matches!(err, Error::UnknownDisplayState { raw: 7 }));
}

#[test]
fn native_setter_changes_state_and_notifies_session() {
    let mock = Arc::new(MockDesktop::new());
    let w = attach(&mock);
    w.set_display_state(DisplayState::Maximized).unwrap();
    assert_eq!(w.display_state().unwrap(), DisplayState::Maximized);
    assert!(mock.calls_contains("set_visual_state:Maximized"));
    assert_eq!(mock.call_count("location_changed"), 1);
    assert!(!mock.calls_contains("invoke:#5"));
}

#[test]
fn ignored_setter_falls_back_to_title_bar() {
    let mock = Arc::new(MockDesktop::new());
    mock.set_honour_visual_setter(false);
    let w = attach(&mock);
    w.set_display_state(DisplayState::Minimized).unwrap();
    assert_eq!(w.display_state().unwrap(), DisplayState::Minimized);
    assert!(mock.calls_contains("invoke:#4"));
    assert_eq!(mock.call_count("location_changed"), 2);
}

#[test]
fn restore_without_restore_button_toggles_maximize() {
    let mock = Arc::new(MockDesktop::new());
    mock.set_honour_visual_setter(false);
    mock.set_visual(VisualState::MAXIMIZED);
    mock.remove_button(RESTORE_BUTTON_ID);
    let w = attach(&mock);
    w.set_display_state(DisplayState::Restored).unwrap();
    assert!(mock.calls_contains("invoke:#5"));
    assert_eq!(w.display_state().unwrap(), DisplayState::Restored);
}

#[test]
fn ignored_setter_without_title_bar_is_not_an_error() {
    let mock = Arc::new(MockDesktop::new());
    mock.set_honour_visual_setter(false);
    mock.set_title_bar(false);
    let w = attach(&mock);
    w.set_display_state(DisplayState::Maximized).unwrap();
    assert_eq!(w.display_state().unwrap(), DisplayState::Restored);
    assert_eq!(mock.call_count("location_changed"), 1);
}

#[test]
fn setting_state_on_a_vanished_window_is_a_no_op() {
    let mock = Arc::new(MockDesktop::new());
    let w = attach(&mock);
    mock.set_gone(true);
    mock.clear_calls();
    w.set_display_state(DisplayState::Maximized).unwrap();
    assert_eq!(setter_calls(&mock), 0);
    assert!(!mock.calls_contains("location_changed"));
}

#[test]
fn focus_with_sets_state_then_focuses() {
    let mock = Arc::new(MockDesktop::new());
    let w = attach(&mock);
    w.focus_with(DisplayState::Maximized).unwrap();
    let calls = mock.calls();
    let set = calls
        .iter()
        .position(|c| c == "set_visual_state:Maximized")
        .unwrap();
    let focus = calls.iter().position(|c| c == "focus:#1").unwrap();
    assert!(set < focus);
    assert!(w.is_currently_active().unwrap());
}
