//! Stream connectors
//!
//! The backend asks a connector for a fresh byte stream at initialization, so
//! tests can substitute scripted streams for a real TCP connection.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::debug;

use crate::config::TelnetConfig;
use crate::error::TelnetError;

/// Bidirectional byte stream usable by a console session
pub trait AsyncStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> AsyncStream for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

pub type BoxedStream = Box<dyn AsyncStream>;

#[async_trait]
pub trait StreamConnector: Send + Sync {
    /// Open a new stream to the console
    async fn connect(&self) -> Result<BoxedStream, TelnetError>;

    /// Human-readable peer description for logs
    fn target(&self) -> String;
}

/// TCP connector with a bounded connect step
pub struct TcpConnector {
    host: String,
    port: u16,
    connect_timeout: Duration,
}

impl TcpConnector {
    pub fn new(host: impl Into<String>, port: u16, connect_timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout,
        }
    }

    pub fn from_config(config: &TelnetConfig) -> Self {
        Self::new(
            config.host.clone(),
            config.port,
            Duration::from_millis(config.connect_timeout_ms),
        )
    }
}

#[async_trait]
impl StreamConnector for TcpConnector {
    async fn connect(&self) -> Result<BoxedStream, TelnetError> {
        let target = self.target();
        let stream = tokio::time::timeout(
            self.connect_timeout,
            TcpStream::connect((self.host.as_str(), self.port)),
        )
        .await
        .map_err(|_| TelnetError::ConnectTimeout {
            target: target.clone(),
            timeout_ms: self.connect_timeout.as_millis() as u64,
        })?
        .map_err(|e| TelnetError::Connect {
            target: target.clone(),
            reason: e.to_string(),
        })?;

        stream.set_nodelay(true)?;
        debug!(peer = %target, "TCP connection established");
        Ok(Box::new(stream))
    }

    fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
