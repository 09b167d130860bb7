//! pdu-core - Core traits and types for CyberPower PDU backends
//!
//! This crate provides the fundamental abstractions that allow different wire
//! protocols (SNMP, Telnet, simulation) to expose one outlet-control surface.

pub mod backend;
pub mod error;
pub mod models;

pub use backend::PduBackend;
pub use error::{PduError, PduResult};
pub use models::{DeviceInventory, IndexKind, OutletCommand};
