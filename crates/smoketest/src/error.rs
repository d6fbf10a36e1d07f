use thiserror::Error;

/// Errors that can occur during smoketest execution.
#[derive(Error, Debug)]
pub enum Error {
    /// The harness configuration could not be loaded.
    #[error("{}", .0.pretty())]
    Config(#[from] config::Error),

    /// A window operation failed unexpectedly.
    #[error(transparent)]
    Harness(#[from] winharness::Error),

    /// A case observed something other than what it expected.
    #[error("expectation failed: {0}")]
    Expectation(String),

    /// One or more cases failed.
    #[error("{failed} of {total} cases failed")]
    CasesFailed {
        /// Number of failing cases.
        failed: usize,
        /// Number of cases run.
        total: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fail with [`Error::Expectation`] unless `cond` holds.
pub fn ensure(cond: bool, what: impl Into<String>) -> Result<()> {
    if cond {
        Ok(())
    } else {
        Err(Error::Expectation(what.into()))
    }
}

/// Print helpful hints for common errors.
pub fn print_hints(err: &Error) {
    match err {
        Error::Config(e) => {
            if let Some(path) = e.path() {
                eprintln!("hint: fix or remove {}", path.display());
            }
            eprintln!(
                "      set {} or pass --config to use another file",
                config::CONFIG_ENV
            );
        }
        Error::Harness(winharness::Error::NotResponding { .. }) => {
            eprintln!("hint: raise busy_timeout_ms in the harness config");
        }
        Error::Harness(_) | Error::Expectation(_) | Error::CasesFailed { .. } => {}
    }
}
