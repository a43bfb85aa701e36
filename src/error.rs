//! Error types for the indicator
//!
//! This module defines all error types used throughout the crate. Module
//! failures are local: the dispatcher logs them and keeps going, so most of
//! these errors end up as a single log line rather than a process exit.
//!
//! Error variants use `#[source]` to preserve error chains for better
//! observability and debugging.

use crate::platform::{StateKey, Topic};
use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Main error type for the indicator
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// The platform rejected a notification subscription
    #[error("Failed to subscribe to {0}")]
    RegistrationFailed(Topic),

    /// Reading a key from the platform state store failed
    #[error("Failed to read {0}")]
    QueryFailed(StateKey),

    /// A key holds a value of a different type than requested
    #[error("Key {key} does not hold a {expected} value")]
    TypeMismatch {
        /// Key that was read
        key: StateKey,
        /// Requested value type
        expected: &'static str,
    },

    /// A platform service (bluetooth, NFC, clock) could not be queried
    #[error("Platform service unavailable: {0}")]
    ServiceUnavailable(&'static str),

    /// Opening or closing the call-manager session failed
    #[error("Call manager error: {0}")]
    CallManager(String),

    /// A line of the event script could not be understood
    #[error("Invalid script line {line}: {reason}")]
    InvalidScript {
        /// One-based line number
        line: usize,
        /// Parser message
        reason: String,
    },

    /// Configuration error
    /// Preserves the underlying error source for full error chain transparency
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for indicator operations
pub type Result<T> = std::result::Result<T, IndicatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_error_display() {
        let error = IndicatorError::RegistrationFailed(Topic::NfcActivation);
        assert_eq!(error.to_string(), "Failed to subscribe to nfc activation");
    }

    #[test]
    fn test_query_error_names_platform_key() {
        let error = IndicatorError::QueryFailed(StateKey::BtDevice);
        assert_eq!(error.to_string(), "Failed to read memory/bluetooth/device");
    }

    #[test]
    fn test_type_mismatch_display() {
        let error = IndicatorError::TypeMismatch {
            key: StateKey::UsbConnected,
            expected: "bool",
        };
        assert_eq!(
            error.to_string(),
            "Key memory/sysman/usb_status does not hold a bool value"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: IndicatorError = io_error.into();
        assert!(matches!(error, IndicatorError::IoError(_)));
    }

    #[test]
    fn test_config_error_keeps_source() {
        use std::error::Error as _;

        let error = IndicatorError::ConfigError(StringError::new("bad path"));
        assert_eq!(error.to_string(), "Configuration error: bad path");
        assert!(error.source().is_some());
    }

    #[test]
    fn test_invalid_script_display() {
        let error = IndicatorError::InvalidScript {
            line: 3,
            reason: "unknown variant".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid script line 3: unknown variant");
    }
}
