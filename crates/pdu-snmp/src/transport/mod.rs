//! Request transports for SNMP
//!
//! - `AgentClient`: async-snmp clients over UDP for real agents
//! - `MockAgent`: in-process OID table for tests and offline use

mod client;
pub mod error;
pub mod mock;

pub use client::AgentClient;
pub use error::TransportError;
pub use mock::MockAgent;

use async_snmp::{Oid, Value};
use async_trait::async_trait;

use crate::error::SnmpError;

/// Single-object get and set against one agent
#[async_trait]
pub trait SnmpTransport: Send + Sync {
    /// Get request sent with the read community
    async fn get(&self, oid: &Oid) -> Result<Value, SnmpError>;

    /// Set request sent with the write community
    async fn set(&self, oid: &Oid, value: Value) -> Result<(), SnmpError>;

    /// Release sockets; the next request reconnects
    async fn disconnect(&self) {}

    /// Human-readable peer description for logs
    fn target(&self) -> String;
}
