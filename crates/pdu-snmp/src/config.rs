//! SNMP backend configuration

use std::time::Duration;

use async_snmp::{Auth, Oid};
use serde::{Deserialize, Serialize};

use crate::error::SnmpError;

/// Configuration for the SNMP backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnmpConfig {
    /// PDU IP address or hostname
    pub host: String,
    /// Agent UDP port (default: 161)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Protocol version
    #[serde(default)]
    pub version: SnmpVersion,
    /// Community used for get requests
    #[serde(default = "default_read_community")]
    pub read_community: String,
    /// Community used for set requests
    #[serde(default = "default_write_community")]
    pub write_community: String,
    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    /// Re-sends after a timeout (0 = single attempt)
    #[serde(default)]
    pub retries: u32,
    /// Base object identifiers
    #[serde(default)]
    pub oids: SnmpOids,
}

impl SnmpConfig {
    /// Default configuration for a PDU at `host`
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            version: SnmpVersion::default(),
            read_community: default_read_community(),
            write_community: default_write_community(),
            timeout_ms: default_timeout(),
            retries: 0,
            oids: SnmpOids::default(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_port() -> u16 {
    161
}

fn default_read_community() -> String {
    "public".to_string()
}

fn default_write_community() -> String {
    "private".to_string()
}

fn default_timeout() -> u64 {
    1000
}

/// SNMP protocol version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnmpVersion {
    #[default]
    V1,
    V2c,
}

impl SnmpVersion {
    /// Community credentials for a client speaking this version
    pub fn auth(self, community: &str) -> Auth {
        match self {
            SnmpVersion::V1 => Auth::v1(community),
            SnmpVersion::V2c => Auth::v2c(community),
        }
    }
}

// =============================================================================
// Object Identifiers
// =============================================================================

/// Base object identifiers for outlet and bank access.
///
/// Defaults follow CyberPower_MIB_v2.11. Indexed objects get the outlet or
/// bank number appended as a final arc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnmpOids {
    /// ePDUOutletDevNumCntrlOutlets
    #[serde(default = "default_outlet_count_oid")]
    pub outlet_count: String,
    /// ePDULoadDevNumBanks
    #[serde(default = "default_bank_count_oid")]
    pub bank_count: String,
    /// ePDUOutletStatusOutletState, indexed by outlet
    #[serde(default = "default_outlet_state_oid")]
    pub outlet_state: String,
    /// ePDUOutletControlOutletCommand, indexed by outlet
    #[serde(default = "default_outlet_command_oid")]
    pub outlet_command: String,
    /// ePDU2BankStatusLoad (tenths of an amp), indexed by bank
    #[serde(default = "default_bank_load_oid")]
    pub bank_load: String,
}

impl Default for SnmpOids {
    fn default() -> Self {
        Self {
            outlet_count: default_outlet_count_oid(),
            bank_count: default_bank_count_oid(),
            outlet_state: default_outlet_state_oid(),
            outlet_command: default_outlet_command_oid(),
            bank_load: default_bank_load_oid(),
        }
    }
}

/// Parse a dotted object identifier; a leading dot is optional
pub fn parse_oid(text: &str) -> Result<Oid, SnmpError> {
    let oid = Oid::parse(text)?;
    if oid.is_empty() || oid.validate().is_err() {
        return Err(SnmpError::InvalidOid(format!("'{}'", text)));
    }
    Ok(oid)
}

fn default_outlet_count_oid() -> String {
    ".1.3.6.1.4.1.3808.1.1.3.3.1.3.0".to_string()
}

fn default_bank_count_oid() -> String {
    ".1.3.6.1.4.1.3808.1.1.3.2.1.4.0".to_string()
}

fn default_outlet_state_oid() -> String {
    ".1.3.6.1.4.1.3808.1.1.3.3.5.1.1.4".to_string()
}

fn default_outlet_command_oid() -> String {
    ".1.3.6.1.4.1.3808.1.1.3.3.3.1.1.4".to_string()
}

fn default_bank_load_oid() -> String {
    ".1.3.6.1.4.1.3808.1.1.6.5.4.1.5".to_string()
}
