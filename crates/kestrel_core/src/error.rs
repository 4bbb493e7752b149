//! Error taxonomy for the interaction core
//!
//! Every error here is non-fatal. Operations that fail leave their state
//! untouched and report the failure through `tracing`; the controller then
//! carries on with the next event.

use thiserror::Error;

use crate::selection::SelectionMode;

/// How an error should be treated when it is reported
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Acting on an option that is gone or was never there. Usually a benign
    /// race between unmount and event dispatch.
    StaleReference,
    /// Programmer misuse that the core refuses to carry out.
    InvariantViolation,
    /// Controlled/uncontrolled usage changed over the component's lifetime.
    ConfigurationMismatch,
}

/// Errors produced by the selection core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("option {id} is not registered")]
    StaleOption { id: String },

    #[error("no registered option has value {value}")]
    UnknownValue { value: String },

    #[error("option {id} is not visible or is disabled")]
    NotNavigable { id: String },

    #[error("value {value} is already registered by a live option")]
    DuplicateValue { value: String },

    #[error("{operation} is not available in {mode} selection mode")]
    InvalidForMode {
        operation: &'static str,
        mode: SelectionMode,
    },

    #[error("{state}: {detail}")]
    ConfigurationMismatch { state: &'static str, detail: String },
}

impl SelectError {
    /// Classify the error
    pub fn class(&self) -> ErrorClass {
        match self {
            SelectError::StaleOption { .. }
            | SelectError::UnknownValue { .. }
            | SelectError::NotNavigable { .. } => ErrorClass::StaleReference,
            SelectError::DuplicateValue { .. } | SelectError::InvalidForMode { .. } => {
                ErrorClass::InvariantViolation
            }
            SelectError::ConfigurationMismatch { .. } => ErrorClass::ConfigurationMismatch,
        }
    }

    /// Log the error at the level its class calls for
    pub fn report(&self) {
        match self.class() {
            ErrorClass::StaleReference => tracing::warn!("ignoring stale reference: {}", self),
            ErrorClass::InvariantViolation => tracing::error!("rejected operation: {}", self),
            ErrorClass::ConfigurationMismatch => {
                tracing::warn!("configuration mismatch: {}", self)
            }
        }
    }

    /// Report the error and hand it back, for use with `map_err`
    pub(crate) fn reported(self) -> Self {
        self.report();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        let stale = SelectError::StaleOption { id: "1v1".into() };
        assert_eq!(stale.class(), ErrorClass::StaleReference);

        let dup = SelectError::DuplicateValue { value: "\"a\"".into() };
        assert_eq!(dup.class(), ErrorClass::InvariantViolation);

        let mode = SelectError::InvalidForMode {
            operation: "select_all_enabled",
            mode: SelectionMode::Single,
        };
        assert_eq!(mode.class(), ErrorClass::InvariantViolation);
        assert_eq!(
            mode.to_string(),
            "select_all_enabled is not available in single selection mode"
        );
    }
}
