use std::{env, fs, path::PathBuf, process, time::Duration};

use crate::{Error, HarnessConfig, load_from_path, load_from_str, resolve_config_path};

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let mut p = env::temp_dir();
    p.push(format!("winharness-config-{}-{}", process::id(), name));
    fs::write(&p, contents).unwrap();
    p
}

#[test]
fn empty_document_yields_defaults() {
    let cfg = load_from_str("()").unwrap();
    assert_eq!(cfg, HarnessConfig::default());
    assert_eq!(cfg.busy_timeout(), Duration::from_millis(5000));
    assert_eq!(cfg.min_open_time(), Duration::from_millis(500));
    assert!(cfg.wait_on_hourglass());
    assert!(!cfg.keep_open_on_dispose());
}

#[test]
fn fields_override_defaults() {
    let cfg = load_from_str(
        "(busy_timeout_ms: 1200, in_process: true, nudge_pointer_for_hourglass: true, keep_open_on_dispose: true)",
    )
    .unwrap();
    assert_eq!(cfg.busy_timeout(), Duration::from_millis(1200));
    assert!(cfg.in_process());
    assert!(cfg.nudge_pointer());
    assert!(cfg.keep_open_on_dispose());
    assert_eq!(cfg.poll_interval(), Duration::from_millis(200));
}

#[test]
fn unknown_fields_are_parse_errors() {
    let err = load_from_str("(busy_timeout: 10)").unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}

#[test]
fn zero_timeout_is_rejected() {
    let err = load_from_str("(busy_timeout_ms: 0)").unwrap_err();
    assert!(matches!(
        err,
        Error::Validation {
            field: "busy_timeout_ms",
            ..
        }
    ));
    assert!(err.pretty().contains("busy_timeout_ms"));
}

#[test]
fn poll_interval_longer_than_timeout_is_rejected() {
    let err = load_from_str("(busy_timeout_ms: 100, poll_interval_ms: 500)").unwrap_err();
    assert!(matches!(
        err,
        Error::Validation {
            field: "poll_interval_ms",
            ..
        }
    ));
}

#[test]
fn load_from_path_attaches_path_to_errors() {
    let p = scratch_file("bad.ron", "(busy_timeout_ms: 0)");
    let err = load_from_path(&p).unwrap_err();
    assert_eq!(err.path(), Some(p.as_path()));
    fs::remove_file(&p).ok();

    let p = scratch_file("garbage.ron", "(busy_timeout_ms: ");
    let err = load_from_path(&p).unwrap_err();
    assert!(matches!(err, Error::Parse { path: Some(_), .. }));
    fs::remove_file(&p).ok();
}

#[test]
fn load_from_path_reads_file() {
    let p = scratch_file("good.ron", "(min_open_time_ms: 50)");
    let cfg = load_from_path(&p).unwrap();
    assert_eq!(cfg.min_open_time(), Duration::from_millis(50));
    fs::remove_file(&p).ok();
}

#[test]
fn wrong_extension_is_rejected() {
    let p = scratch_file("cfg.toml", "()");
    let err = load_from_path(&p).unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
    fs::remove_file(&p).ok();
}

#[test]
fn explicit_missing_path_is_an_error() {
    let missing = env::temp_dir().join("winharness-definitely-missing.ron");
    let err = resolve_config_path(Some(&missing)).unwrap_err();
    assert_eq!(err.path(), Some(missing.as_path()));
}
