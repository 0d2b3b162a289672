//! Error taxonomy for a regeneration run.
//!
//! Only conditions that abort the run are errors. An infeasible or empty
//! day is recorded in the [`CompletionReport`](crate::CompletionReport), and
//! unmet student hours are a reported business outcome.

use crate::store::StoreError;

/// Fatal errors of a regeneration run.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// Input or configuration is malformed. Raised before anything is written.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The storage collaborator rejected a read or write.
    ///
    /// Days committed before the failure stay in place.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl ScheduleError {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Whether this is a persistence failure.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
