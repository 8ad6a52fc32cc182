//! CLI command implementations for Skirmish.

pub(crate) mod replay;
pub(crate) mod run;

use clap::ValueEnum;
use std::error::Error;
use std::fmt;

/// Built-in agent selection for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum AgentKind {
    /// March toward the enemy headquarters, attacking on contact.
    Advance,
    /// Pass every turn.
    Passive,
}

impl AgentKind {
    pub(crate) fn build(self) -> Box<dyn skirmish::agent::Agent> {
        match self {
            Self::Advance => Box::new(skirmish::agent::AdvanceAgent),
            Self::Passive => Box::new(skirmish::agent::PassiveAgent),
        }
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<skirmish::ConfigError> for CliError {
    fn from(e: skirmish::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<skirmish::replay::ReplayError> for CliError {
    fn from(e: skirmish::replay::ReplayError) -> Self {
        Self::new(e.to_string())
    }
}
