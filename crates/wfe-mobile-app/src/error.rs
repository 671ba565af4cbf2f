/*
[INPUT]:  Adapter errors and orchestration preconditions
[OUTPUT]: Application error type and user-facing messages
[POS]:    Error handling layer - view-state orchestrator
[UPDATE]: When adding orchestrator operations with new failure modes
*/

use thiserror::Error;
use wfe_mobile_adapter::WfeError;

use crate::app::action::Action;

#[derive(Error, Debug)]
pub enum AppError {
    /// Failure reported by the REST adapter
    #[error(transparent)]
    Adapter(#[from] WfeError),

    /// Operation needs a session
    #[error("not logged in")]
    NotLoggedIn,

    /// The same action is still pending
    #[error("{0} is already in progress")]
    InFlight(Action),

    /// A logout or another login finished while this request was pending
    #[error("session changed while the request was pending")]
    SessionChanged,

    /// Process id is not among the tracked processes
    #[error("process {0} is not tracked")]
    UnknownProcess(i64),

    /// No task form is open, or the field does not belong to it
    #[error("task form error: {0}")]
    TaskForm(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn is_auth_error(&self) -> bool {
        matches!(self, AppError::Adapter(err) if err.is_auth_error())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_auth_error_is_detected() {
        let err = AppError::from(WfeError::authentication("bad password"));
        assert!(err.is_auth_error());
        assert!(!AppError::NotLoggedIn.is_auth_error());
    }

    #[test]
    fn test_in_flight_message_names_action() {
        let err = AppError::InFlight(Action::CompleteTask(7));
        assert_eq!(err.to_string(), "completing task 7 is already in progress");
    }
}
