//! cyberpower-pdu - Outlet control for CyberPower PDUs
//!
//! One facade, [`CyberPowerPdu`], drives a PDU over either SNMP or the telnet
//! console. The protocol is picked at construction and the same operation
//! set ([`PduBackend`]) is available regardless of the choice.
//!
//! # Example
//!
//! ```no_run
//! use cyberpower_pdu::{CyberPowerPdu, PduBackend, PduConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PduConfig::from_toml_str(
//!     r#"
//!     protocol = "telnet"
//!     host = "192.168.1.132"
//!     "#,
//! )?;
//! let mut pdu = CyberPowerPdu::from_config(config)?;
//! pdu.initialize().await?;
//! println!("outlet 1 on: {}", pdu.get_outlet_state(1).await?);
//! pdu.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod pdu;
pub mod testing;

pub use config::{BackendKind, PduConfig};
pub use pdu::CyberPowerPdu;
pub use testing::SimulatedPdu;

pub use pdu_core::{DeviceInventory, IndexKind, OutletCommand, PduBackend, PduError, PduResult};
pub use pdu_snmp::{SnmpConfig, SnmpOids, SnmpPdu, SnmpVersion};
pub use pdu_telnet::{TelnetConfig, TelnetPdu, TelnetPrompts};
