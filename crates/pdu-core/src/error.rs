//! Common error types for PDU backends

use thiserror::Error;

use crate::models::IndexKind;

/// Result type for backend operations
pub type PduResult<T> = Result<T, PduError>;

/// Errors that can occur in PDU backends
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PduError {
    /// Operation attempted before `initialize` completed, or after `close`
    #[error("PDU session is not initialized")]
    NotInitialized,

    /// Outlet or bank index outside `1..=max`
    #[error("Invalid {kind} value of: {value}. Valid {kind} values are 1 to {max}")]
    OutOfRange { kind: IndexKind, value: i64, max: u32 },

    /// The transport could not be established during initialization
    #[error("Connection error: {0}")]
    Connection(String),

    /// The device answered but its inventory could not be retrieved
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Transport-level failure during an operation (timeout, unreachable, malformed exchange)
    #[error("Device communication error: {0}")]
    DeviceCommunication(String),

    /// A decoded wire value has a type the client does not handle
    #[error("Unsupported value type: {0}")]
    UnsupportedType(String),

    /// A decoded wire value is outside the expected enumerated set
    #[error("Unexpected value: {0}")]
    UnexpectedValue(String),

    /// Operation not implemented by the active backend
    #[error("Operation not supported: {0}")]
    UnsupportedOperation(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PduError {
    /// Whether the failure came from the wire and the caller may re-initialize and retry
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PduError::Connection(_) | PduError::DeviceCommunication(_)
        )
    }

    /// Build an out-of-range error for an outlet index
    pub fn outlet_out_of_range(value: i64, max: u32) -> Self {
        PduError::OutOfRange {
            kind: IndexKind::Outlet,
            value,
            max,
        }
    }

    /// Build an out-of-range error for a bank index
    pub fn bank_out_of_range(value: i64, max: u32) -> Self {
        PduError::OutOfRange {
            kind: IndexKind::Bank,
            value,
            max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = PduError::outlet_out_of_range(0, 16);
        assert_eq!(
            err.to_string(),
            "Invalid outlet value of: 0. Valid outlet values are 1 to 16"
        );

        let err = PduError::bank_out_of_range(-3, 2);
        assert_eq!(
            err.to_string(),
            "Invalid bank value of: -3. Valid bank values are 1 to 2"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(PduError::DeviceCommunication("timeout".into()).is_retryable());
        assert!(PduError::Connection("refused".into()).is_retryable());
        assert!(!PduError::NotInitialized.is_retryable());
        assert!(!PduError::outlet_out_of_range(9, 8).is_retryable());
    }
}
