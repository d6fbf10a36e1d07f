use std::sync::Arc;

use config::HarnessConfig;
use winharness::mock::MockDesktop;

use super::support::{attach, fast};
use crate::error::{Result, ensure};

pub fn drop_closes(base: &HarnessConfig) -> Result<()> {
    let mock = Arc::new(MockDesktop::new());
    let cfg = HarnessConfig {
        keep_open_on_dispose: false,
        ..fast(base)
    };
    drop(attach(&mock, cfg)?);
    ensure(mock.is_gone(), "window still open after its handle was dropped")
}

pub fn keep_open(base: &HarnessConfig) -> Result<()> {
    let mock = Arc::new(MockDesktop::new());
    let cfg = HarnessConfig {
        keep_open_on_dispose: true,
        ..fast(base)
    };
    drop(attach(&mock, cfg)?);
    ensure(!mock.is_gone(), "window closed despite keep_open_on_dispose")?;
    ensure(mock.registered().len() == 1, "window was not registered")
}
