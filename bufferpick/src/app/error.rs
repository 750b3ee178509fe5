//! Application error types.

use std::fmt;

use crate::picker::PickerError;
use crate::provision::ProvisionError;

/// Errors that can occur while wiring or driving the application.
#[derive(Debug)]
pub enum AppError {
    /// Map/view configuration was rejected.
    Provision(ProvisionError),

    /// Picker configuration or operation failed.
    Picker(PickerError),

    /// No Tokio runtime to run background work on.
    NoRuntime,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Provision(e) => write!(f, "Failed to configure map/view: {}", e),
            AppError::Picker(e) => write!(f, "Picker error: {}", e),
            AppError::NoRuntime => write!(f, "No Tokio runtime available"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Provision(e) => Some(e),
            AppError::Picker(e) => Some(e),
            AppError::NoRuntime => None,
        }
    }
}

impl From<ProvisionError> for AppError {
    fn from(e: ProvisionError) -> Self {
        AppError::Provision(e)
    }
}

impl From<PickerError> for AppError {
    fn from(e: PickerError) -> Self {
        AppError::Picker(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Provision(ProvisionError::InvalidZoom(f64::NAN));
        assert!(err.to_string().contains("Failed to configure map/view"));
        assert!(err.source().is_some());
        assert_eq!(AppError::NoRuntime.to_string(), "No Tokio runtime available");
    }

    #[test]
    fn test_app_error_from_picker_error() {
        let err: AppError = PickerError::InvalidRadius(-1.0).into();
        assert!(matches!(err, AppError::Picker(_)));
        assert!(err.source().is_some());
    }
}
