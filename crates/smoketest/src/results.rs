//! Case result types.

use std::time::Duration;

/// Outcome of one smoketest case.
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    /// Registry slug of the case.
    pub name: &'static str,
    /// Whether the case passed
    pub success: bool,
    /// Time taken to run the case
    pub elapsed: Duration,
    /// Failure message, if any
    pub message: Option<String>,
}

impl CaseOutcome {
    pub fn success(name: &'static str, elapsed: Duration) -> Self {
        Self {
            name,
            success: true,
            elapsed,
            message: None,
        }
    }

    pub fn failure(name: &'static str, elapsed: Duration, message: impl Into<String>) -> Self {
        Self {
            name,
            success: false,
            elapsed,
            message: Some(message.into()),
        }
    }

    /// Format the outcome as a status line for display.
    pub fn format_status(&self) -> String {
        let status = if self.success { "OK" } else { "FAIL" };
        let elapsed = format!("{}ms", self.elapsed.as_millis());
        match &self.message {
            Some(msg) => format!("{}: {} ({}, elapsed={})", self.name, status, msg, elapsed),
            None => format!("{}: {} (elapsed={})", self.name, status, elapsed),
        }
    }
}
