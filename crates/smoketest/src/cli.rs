//! Command-line interface definitions for smoketest.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use logging::LogArgs;

use crate::suite::Group;

/// Command-line interface arguments for the smoketest binary.
#[derive(Parser, Debug)]
#[command(
    name = "smoketest",
    about = "Exercise the winharness window protocols",
    version
)]
pub struct Cli {
    /// Logging controls
    #[command(flatten)]
    pub log: LogArgs,

    /// Harness config file (defaults to $WINHARNESS_CONFIG, then ~/.winharness/config.ron)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only print failures
    #[arg(long)]
    pub quiet: bool,

    /// Keep running after a case fails
    #[arg(long)]
    pub no_fail_fast: bool,

    /// Which cases to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run every case
    All,
    /// Readiness detection cases
    Readiness,
    /// Close handshake cases
    Close,
    /// Display-state cases
    Display,
    /// Attach and drop cases
    Lifecycle,
}

impl Commands {
    /// Case group selected by this command; `None` selects all cases.
    pub fn group(self) -> Option<Group> {
        match self {
            Self::All => None,
            Self::Readiness => Some(Group::Readiness),
            Self::Close => Some(Group::Close),
            Self::Display => Some(Group::Display),
            Self::Lifecycle => Some(Group::Lifecycle),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags_and_subcommand() {
        let cli = Cli::try_parse_from([
            "smoketest",
            "--debug",
            "--no-fail-fast",
            "--config",
            "/tmp/h.ron",
            "close",
        ])
        .unwrap();
        assert!(cli.log.debug);
        assert!(cli.no_fail_fast);
        assert_eq!(cli.command.group(), Some(Group::Close));
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/h.ron")));
    }
}
