//! pdu-telnet - Telnet console backend for CyberPower PDUs
//!
//! Implements [`pdu_core::PduBackend`] by driving the PDU's interactive
//! console: log in, issue `oltsta show` / `oltctrl` line commands and parse
//! the tabular replies.
//!
//! - `iac`: telnet option negotiation filter
//! - `session`: buffered line session with login handshake
//! - `parser`: status table parsing
//! - `connector`: TCP (or scripted) stream creation

pub mod backend;
pub mod config;
pub mod connector;
pub mod error;
pub mod iac;
pub mod parser;
pub mod session;

pub use backend::TelnetPdu;
pub use config::{TelnetConfig, TelnetPrompts};
pub use connector::{BoxedStream, StreamConnector, TcpConnector};
pub use error::TelnetError;
pub use parser::{parse_status, OutletStatus};
pub use session::TelnetSession;
