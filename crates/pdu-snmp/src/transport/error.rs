//! Transport layer errors

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransportError {
    /// Target could not be resolved or the local socket could not be opened
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Socket error during an exchange (e.g. ICMP port unreachable)
    #[error("Socket error: {0}")]
    Socket(String),

    #[error("Timeout: {0}")]
    Timeout(String),
}
