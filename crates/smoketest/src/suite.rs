//! Case registry and runner.

use std::time::Instant;

use config::HarnessConfig;
use tracing::{debug, info};

use crate::{
    cases,
    error::{Error, Result, print_hints},
    results::CaseOutcome,
};

/// Protocol area a case exercises; each maps to a subcommand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Group {
    /// Wait-while-busy stages.
    Readiness,
    /// Close handshake.
    Close,
    /// Display-state transitions.
    Display,
    /// Attach and drop.
    Lifecycle,
}

/// Registry entry describing a smoketest case.
pub struct CaseEntry {
    /// Registry slug used in output.
    pub name: &'static str,
    /// Group the case belongs to.
    pub group: Group,
    /// Short description shown before the case runs.
    pub info: &'static str,
    /// Function pointer invoked to execute the case.
    pub run: fn(&HarnessConfig) -> Result<()>,
}

/// All registered cases, in run order.
pub static CASES: &[CaseEntry] = &[
    CaseEntry {
        name: "readiness.recovers",
        group: Group::Readiness,
        info: "interaction state flips from NotResponding to Running",
        run: cases::readiness::recovers,
    },
    CaseEntry {
        name: "readiness.timeout",
        group: Group::Readiness,
        info: "a window that never responds reports the last state",
        run: cases::readiness::times_out,
    },
    CaseEntry {
        name: "readiness.hourglass",
        group: Group::Readiness,
        info: "wait cursor clears after pointer nudges",
        run: cases::readiness::hourglass,
    },
    CaseEntry {
        name: "readiness.process-exited",
        group: Group::Readiness,
        info: "an exited process is fatal",
        run: cases::readiness::process_exited,
    },
    CaseEntry {
        name: "close.title-bar",
        group: Group::Close,
        info: "close button preferred over the native command",
        run: cases::close::title_bar,
    },
    CaseEntry {
        name: "close.native",
        group: Group::Close,
        info: "no title bar: native close exactly once",
        run: cases::close::native,
    },
    CaseEntry {
        name: "close.retry",
        group: Group::Close,
        info: "vanishing element is retried once after a delay",
        run: cases::close::retry,
    },
    CaseEntry {
        name: "close.grace",
        group: Group::Close,
        info: "close blocks until the minimum lifetime has passed",
        run: cases::close::grace,
    },
    CaseEntry {
        name: "display.no-op",
        group: Group::Display,
        info: "setting the current state never calls the native setter",
        run: cases::display::no_op,
    },
    CaseEntry {
        name: "display.title-bar-fallback",
        group: Group::Display,
        info: "ignored native setter falls back to title-bar buttons",
        run: cases::display::title_bar_fallback,
    },
    CaseEntry {
        name: "display.unknown",
        group: Group::Display,
        info: "unmapped visual state is fatal",
        run: cases::display::unknown_state,
    },
    CaseEntry {
        name: "lifecycle.drop-closes",
        group: Group::Lifecycle,
        info: "dropping a window handle closes the window",
        run: cases::lifecycle::drop_closes,
    },
    CaseEntry {
        name: "lifecycle.keep-open",
        group: Group::Lifecycle,
        info: "keep_open_on_dispose leaves the window alone",
        run: cases::lifecycle::keep_open,
    },
];

/// Options controlling a suite run.
#[derive(Clone, Copy, Debug)]
pub struct RunOpts {
    /// Suppress per-case status lines for passing cases.
    pub quiet: bool,
    /// Stop at the first failing case.
    pub fail_fast: bool,
}

/// Run every case in `group` (all cases when `None`).
pub fn run(group: Option<Group>, cfg: &HarnessConfig, opts: RunOpts) -> Result<Vec<CaseOutcome>> {
    let mut outcomes = Vec::new();
    for entry in CASES
        .iter()
        .filter(|e| group.is_none_or(|g| g == e.group))
    {
        if !opts.quiet {
            info!(case = entry.name, "{}", entry.info);
        }
        let outcome = run_case(entry, cfg);
        if !outcome.success || !opts.quiet {
            println!("{}", outcome.format_status());
        }
        let failed = !outcome.success;
        outcomes.push(outcome);
        if failed && opts.fail_fast {
            debug!(case = entry.name, "stopping after first failure");
            break;
        }
    }

    let failed = outcomes.iter().filter(|o| !o.success).count();
    if failed > 0 {
        return Err(Error::CasesFailed {
            failed,
            total: outcomes.len(),
        });
    }
    Ok(outcomes)
}

fn run_case(entry: &CaseEntry, cfg: &HarnessConfig) -> CaseOutcome {
    let start = Instant::now();
    match (entry.run)(cfg) {
        Ok(()) => CaseOutcome::success(entry.name, start.elapsed()),
        Err(e) => {
            print_hints(&e);
            CaseOutcome::failure(entry.name, start.elapsed(), e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn case_names_are_unique_and_grouped() {
        let names: HashSet<_> = CASES.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), CASES.len());
        for group in [
            Group::Readiness,
            Group::Close,
            Group::Display,
            Group::Lifecycle,
        ] {
            assert!(CASES.iter().any(|c| c.group == group), "{group:?}");
        }
    }

    #[test]
    fn every_case_passes_against_the_mock() {
        let cfg = HarnessConfig {
            min_open_time_ms: 50,
            ..HarnessConfig::default()
        };
        let opts = RunOpts {
            quiet: true,
            fail_fast: false,
        };
        let outcomes = run(None, &cfg, opts).unwrap();
        assert_eq!(outcomes.len(), CASES.len());
    }
}
