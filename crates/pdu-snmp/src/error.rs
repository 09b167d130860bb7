//! SNMP backend errors

use async_snmp::ErrorStatus;
use pdu_core::PduError;
use thiserror::Error;

use crate::transport::TransportError;

/// SNMP-specific errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SnmpError {
    /// Datagram exchange failed (unreachable, timeout, socket error)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Malformed or unusable message from the agent
    #[error("Malformed SNMP message: {0}")]
    Decode(String),

    /// Agent answered with a non-zero error-status
    #[error("SNMP error status {status} at varbind {index}")]
    ErrorStatus { status: ErrorStatus, index: u32 },

    /// Response did not correlate with the outstanding request
    #[error("Response request-id {actual} does not match request {expected}")]
    RequestIdMismatch { expected: i32, actual: i32 },

    /// Response PDU had an unexpected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Agent returned an exception marker (noSuchObject, ...)
    #[error("Agent returned {0}")]
    Exception(&'static str),

    #[error("{0}")]
    UnsupportedType(String),

    #[error("{0}")]
    UnexpectedValue(String),

    #[error("Invalid object identifier: {0}")]
    InvalidOid(String),
}

impl SnmpError {
    /// True when the agent could not be reached or never answered
    pub fn is_transport(&self) -> bool {
        matches!(self, SnmpError::Transport(_))
    }
}

impl From<async_snmp::Error> for SnmpError {
    fn from(err: async_snmp::Error) -> Self {
        use async_snmp::Error;

        match err {
            Error::Timeout {
                elapsed, retries, ..
            } => TransportError::Timeout(format!(
                "no response after {:?} ({} retries)",
                elapsed, retries
            ))
            .into(),
            Error::Io { source, .. } => TransportError::Socket(source.to_string()).into(),
            Error::Snmp { status, index, .. } => SnmpError::ErrorStatus { status, index },
            Error::RequestIdMismatch { expected, actual } => {
                SnmpError::RequestIdMismatch { expected, actual }
            }
            other @ Error::InvalidOid { .. } => SnmpError::InvalidOid(other.to_string()),
            other => SnmpError::Decode(other.to_string()),
        }
    }
}

impl From<SnmpError> for PduError {
    fn from(err: SnmpError) -> Self {
        match err {
            SnmpError::UnsupportedType(msg) => PduError::UnsupportedType(msg),
            SnmpError::UnexpectedValue(msg) => PduError::UnexpectedValue(msg),
            SnmpError::InvalidOid(msg) => PduError::Config(format!("invalid OID: {}", msg)),
            other => PduError::DeviceCommunication(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_status_maps_to_device_communication() {
        let err: PduError = SnmpError::ErrorStatus {
            status: ErrorStatus::NoSuchName,
            index: 1,
        }
        .into();
        match err {
            PduError::DeviceCommunication(msg) => assert!(msg.contains("noSuchName")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_timeout_maps_to_device_communication() {
        let err: PduError = SnmpError::from(TransportError::Timeout("1000 ms".into())).into();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_value_errors_keep_their_kind() {
        let err: PduError = SnmpError::UnexpectedValue("7".into()).into();
        assert_eq!(err, PduError::UnexpectedValue("7".into()));
        let err: PduError = SnmpError::UnsupportedType("Null".into()).into();
        assert_eq!(err, PduError::UnsupportedType("Null".into()));
    }

    #[test]
    fn test_client_timeout_is_transport() {
        let err = SnmpError::from(async_snmp::Error::Timeout {
            target: None,
            elapsed: Duration::from_millis(300),
            request_id: 7,
            retries: 2,
        });
        assert!(err.is_transport());
        assert!(err.to_string().contains("2 retries"));
    }

    #[test]
    fn test_client_socket_error_is_transport() {
        let err = SnmpError::from(async_snmp::Error::Io {
            target: None,
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        });
        assert!(matches!(err, SnmpError::Transport(TransportError::Socket(_))));
    }

    #[test]
    fn test_client_error_status_keeps_index() {
        let err = SnmpError::from(async_snmp::Error::Snmp {
            target: None,
            status: ErrorStatus::NotWritable,
            index: 1,
            oid: None,
        });
        assert!(!err.is_transport());
        assert!(matches!(
            err,
            SnmpError::ErrorStatus {
                status: ErrorStatus::NotWritable,
                index: 1
            }
        ));
    }

    #[test]
    fn test_client_request_id_mismatch() {
        let err = SnmpError::from(async_snmp::Error::RequestIdMismatch {
            expected: 4,
            actual: 999_999,
        });
        assert!(err.to_string().contains("999999"));
    }
}
