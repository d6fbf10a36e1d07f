use std::{result::Result as StdResult, time::Duration};

use thiserror::Error;

use crate::ops::Attribute;

/// Suffix appended to every readiness failure so callers can recognise a busy window.
pub const BUSY_HINT: &str =
    " (the window may be busy; consider raising busy_timeout in the harness config)";

/// Errors surfaced by window operations and by the collaborators behind them.
#[derive(Error, Debug)]
pub enum Error {
    /// The element handle expired; the operation is no longer valid for it.
    #[error("element handle is stale")]
    Stale,

    /// The element is no longer available in the accessibility tree.
    #[error("element is no longer available")]
    Unavailable,

    /// The automation provider rejected or failed the operation.
    #[error("automation operation failed: {0}")]
    Automation(String),

    /// A bounded wait expired before its condition held.
    #[error("timed out waiting for {condition} after {elapsed:?} (last observed: {last})")]
    Timeout {
        /// Human-readable condition description.
        condition: &'static str,
        /// Time spent waiting.
        elapsed: Duration,
        /// Last value observed before the deadline.
        last: String,
    },

    /// The process owning the window has exited.
    #[error("process {0} not found (exited?)")]
    ProcessNotFound(u32),

    /// The native visual state matched no entry of the display-state table.
    #[error("window is not in any known display state (native value {raw}); it may be closed")]
    UnknownDisplayState {
        /// Native visual-state code that was read.
        raw: i32,
    },

    /// An attribute came back with a value of an unexpected kind.
    #[error("attribute {attr:?} returned {got} value")]
    AttributeType {
        /// Attribute that was read.
        attr: Attribute,
        /// Kind of value that was returned instead.
        got: &'static str,
    },

    /// Normalised readiness failure: the window did not become ready.
    #[error("window didn't respond{}: {source}", BUSY_HINT)]
    NotResponding {
        /// Stage failure that caused the readiness check to give up.
        source: Box<Error>,
    },
}

/// Convenient result type for window operations.
pub type Result<T> = StdResult<T, Error>;

impl Error {
    /// True for failures that mean "the window is already gone" and are swallowed
    /// by readiness checks.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::Stale | Self::Unavailable)
    }

    /// Close-protocol classification: the element disappeared under us.
    pub fn is_gone(&self) -> bool {
        self.is_benign()
    }

    /// Wrap a readiness stage failure into the single reported failure type.
    pub fn not_responding(source: Self) -> Self {
        match source {
            Self::NotResponding { .. } => source,
            other => Self::NotResponding {
                source: Box::new(other),
            },
        }
    }

    /// Last observed diagnostic value for timeout failures, looking through
    /// [`Error::NotResponding`].
    pub fn last_observed(&self) -> Option<&str> {
        match self {
            Self::Timeout { last, .. } => Some(last.as_str()),
            Self::NotResponding { source } => source.last_observed(),
            _ => None,
        }
    }

    /// Condition name for timeout failures, looking through [`Error::NotResponding`].
    pub fn timeout_condition(&self) -> Option<&'static str> {
        match self {
            Self::Timeout { condition, .. } => Some(*condition),
            Self::NotResponding { source } => source.timeout_condition(),
            _ => None,
        }
    }
}

/// Combinators implementing the swallow/propagate rules.
pub trait ResultExt<T> {
    /// Map benign failures to `Ok(None)` and keep everything else.
    fn benign(self) -> Result<Option<T>>;
}

impl<T> ResultExt<T> for Result<T> {
    fn benign(self) -> Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.is_benign() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benign_swallows_only_gone_errors() {
        assert!(matches!(Err::<(), _>(Error::Stale).benign(), Ok(None)));
        assert!(matches!(Err::<(), _>(Error::Unavailable).benign(), Ok(None)));
        assert!(matches!(Ok::<_, Error>(3).benign(), Ok(Some(3))));
        assert!(matches!(
            Err::<(), _>(Error::Automation("boom".into())).benign(),
            Err(Error::Automation(_))
        ));
    }

    #[test]
    fn not_responding_carries_suffix_and_last_value() {
        let err = Error::not_responding(Error::Timeout {
            condition: "interaction state",
            elapsed: Duration::from_millis(10),
            last: "NotResponding".into(),
        });
        let msg = err.to_string();
        assert!(msg.starts_with("window didn't respond"));
        assert!(msg.contains(BUSY_HINT));
        assert_eq!(err.last_observed(), Some("NotResponding"));
        assert_eq!(err.timeout_condition(), Some("interaction state"));
    }

    #[test]
    fn not_responding_does_not_double_wrap() {
        let inner = Error::not_responding(Error::ProcessNotFound(7));
        let outer = Error::not_responding(inner);
        match outer {
            Error::NotResponding { source } => {
                assert!(matches!(*source, Error::ProcessNotFound(7)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
