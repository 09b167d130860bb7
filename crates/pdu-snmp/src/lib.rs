//! pdu-snmp - SNMP backend for CyberPower PDUs
//!
//! Implements [`pdu_core::PduBackend`] over community-based SNMP (v1 by
//! default, v2c optional) using the CyberPower enterprise MIB.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   SnmpPdu   │  PduBackend: inventory, index checks, value decoding
//! └──────┬──────┘
//!        │ get / set (Oid, Value)
//! ┌──────▼────────┐
//! │ SnmpTransport │  AgentClient (async-snmp over UDP) | MockAgent
//! └───────────────┘
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod transport;
pub mod value;

pub use async_snmp::{ErrorStatus, Oid, Value};
pub use backend::SnmpPdu;
pub use config::{parse_oid, SnmpConfig, SnmpOids, SnmpVersion};
pub use error::SnmpError;
pub use transport::{AgentClient, MockAgent, SnmpTransport, TransportError};
pub use value::DecodedValue;
