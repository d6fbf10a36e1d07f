//! Parse and load harness configuration.

use std::{ffi::OsStr, fs, path::Path};

use tracing::debug;

use crate::{Error, HarnessConfig};

/// Parse and validate a RON configuration document.
pub fn load_from_str(source: &str) -> Result<HarnessConfig, Error> {
    let cfg: HarnessConfig = ron::from_str(source).map_err(|e| Error::Parse {
        path: None,
        message: e.to_string(),
    })?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load a configuration from a `.ron` file at `path`.
pub fn load_from_path(path: &Path) -> Result<HarnessConfig, Error> {
    if path.extension() != Some(OsStr::new("ron")) {
        return Err(Error::Read {
            path: Some(path.to_path_buf()),
            message: "Unsupported config format (expected a .ron file)".to_string(),
        });
    }
    let source = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    let cfg = load_from_str(&source).map_err(|e| match e {
        Error::Parse { message, .. } => Error::Parse {
            path: Some(path.to_path_buf()),
            message,
        },
        other => other.with_path(path),
    })?;
    debug!(path = %path.display(), ?cfg, "loaded harness config");
    Ok(cfg)
}

/// Load the effective configuration: the resolved file when one exists,
/// defaults otherwise.
pub fn load(explicit: Option<&Path>) -> Result<HarnessConfig, Error> {
    match crate::resolve_config_path(explicit)? {
        Some(path) => load_from_path(&path),
        None => {
            debug!("no harness config found; using defaults");
            Ok(HarnessConfig::default())
        }
    }
}
