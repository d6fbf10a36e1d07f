//! Harness configuration for winharness: busy timeouts, readiness behaviour
//! and what happens to windows when their handle is dropped.
#![warn(unsafe_op_in_unsafe_fn)]

use std::{
    env,
    path::{Path, PathBuf},
};

mod defaults;
mod error;
mod harness;
mod loader;

#[cfg(test)]
mod test_parse;

pub use error::Error;
pub use harness::HarnessConfig;
pub use loader::{load, load_from_path, load_from_str};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "WINHARNESS_CONFIG";

/// Determine the preferred user config path (`~/.winharness/config.ron`).
pub fn default_config_path() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".winharness");
    p.push("config.ron");
    p
}

/// Resolve the effective config path using the default policy.
///
/// Policy:
/// 1) Use `explicit` when provided; it must exist.
/// 2) Else use `$WINHARNESS_CONFIG` when set; it must exist.
/// 3) Else use `~/.winharness/config.ron` when it exists.
/// 4) Else `Ok(None)`: run with defaults.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>, Error> {
    let named = explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));
    if let Some(path) = named {
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(Error::Read {
            message: format!("config file {} does not exist", path.display()),
            path: Some(path),
        });
    }

    let preferred = default_config_path();
    if preferred.exists() {
        return Ok(Some(preferred));
    }
    Ok(None)
}
