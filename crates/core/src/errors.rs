use thiserror::Error;

use crate::reminders::ReminderError;
use crate::workflow::WorkflowError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error(transparent)]
    Reminder(#[from] ReminderError),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("configuration failure: {0}")]
    Configuration(String),
    #[error("no record found with id `{0}`")]
    UnknownRecord(String),
}

impl ApplicationError {
    /// Stable machine-readable class for command output and exit-code
    /// mapping.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::Workflow(_)) => "workflow_transition",
            Self::Domain(DomainError::Reminder(_)) => "reminder_input",
            Self::Domain(DomainError::InvariantViolation(_)) => "domain_invariant",
            Self::Configuration(_) => "config_validation",
            Self::UnknownRecord(_) => "unknown_record",
        }
    }
}

impl From<WorkflowError> for ApplicationError {
    fn from(error: WorkflowError) -> Self {
        Self::Domain(DomainError::Workflow(error))
    }
}

impl From<ReminderError> for ApplicationError {
    fn from(error: ReminderError) -> Self {
        Self::Domain(DomainError::Reminder(error))
    }
}

impl From<crate::config::ConfigError> for ApplicationError {
    fn from(error: crate::config::ConfigError) -> Self {
        Self::Configuration(error.to_string())
    }
}
