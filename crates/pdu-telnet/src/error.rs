//! Telnet backend errors

use pdu_core::PduError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TelnetError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Connection to {target} failed: {reason}")]
    Connect { target: String, reason: String },

    #[error("Connection to {target} timed out after {timeout_ms} ms")]
    ConnectTimeout { target: String, timeout_ms: u64 },

    /// Stream reached EOF while a marker was still expected
    #[error("Connection closed while waiting for {marker:?}")]
    ClosedBeforeMarker { marker: String },

    /// Console answered the password with another login prompt
    #[error("Login rejected for user {0}")]
    LoginRejected(String),

    /// Every status query returned a page without outlet rows
    #[error("No outlet rows in status output after {attempts} attempts")]
    StatusUnavailable { attempts: u32 },

    /// Status page parsed but did not list the outlet
    #[error("Outlet {0} missing from status output")]
    MissingOutlet(u32),
}

impl From<std::io::Error> for TelnetError {
    fn from(err: std::io::Error) -> Self {
        TelnetError::Io(err.to_string())
    }
}

impl From<TelnetError> for PduError {
    fn from(err: TelnetError) -> Self {
        match err {
            TelnetError::MissingOutlet(_) => PduError::UnexpectedValue(err.to_string()),
            other => PduError::DeviceCommunication(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping() {
        let err: PduError = TelnetError::StatusUnavailable { attempts: 5 }.into();
        assert!(matches!(err, PduError::DeviceCommunication(_)));

        let err: PduError = TelnetError::MissingOutlet(4).into();
        assert_eq!(
            err,
            PduError::UnexpectedValue("Outlet 4 missing from status output".to_string())
        );
    }

    #[test]
    fn test_closed_message_quotes_marker() {
        let err = TelnetError::ClosedBeforeMarker {
            marker: "CyberPower > ".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Connection closed while waiting for \"CyberPower > \""
        );
    }
}
