//! Facade configuration

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use pdu_core::{PduError, PduResult};
use pdu_snmp::SnmpConfig;
use pdu_telnet::TelnetConfig;
use serde::{Deserialize, Serialize};

/// Wire protocol used to reach the PDU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Snmp,
    Telnet,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Snmp => f.write_str("snmp"),
            BackendKind::Telnet => f.write_str("telnet"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = PduError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snmp" => Ok(BackendKind::Snmp),
            "telnet" => Ok(BackendKind::Telnet),
            other => Err(PduError::Config(format!(
                "unknown protocol '{}' (expected snmp or telnet)",
                other
            ))),
        }
    }
}

/// Complete connection settings for one PDU
///
/// ```toml
/// protocol = "snmp"
/// host = "192.168.1.132"
/// write_community = "private"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "protocol", rename_all = "lowercase")]
pub enum PduConfig {
    Snmp(SnmpConfig),
    Telnet(TelnetConfig),
}

impl PduConfig {
    /// Defaults for `kind` at `host`
    pub fn new(host: impl Into<String>, kind: BackendKind) -> Self {
        match kind {
            BackendKind::Snmp => PduConfig::Snmp(SnmpConfig::new(host)),
            BackendKind::Telnet => PduConfig::Telnet(TelnetConfig::new(host)),
        }
    }

    pub fn from_toml_str(text: &str) -> PduResult<Self> {
        toml::from_str(text).map_err(|e| PduError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> PduResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| PduError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            PduConfig::Snmp(_) => BackendKind::Snmp,
            PduConfig::Telnet(_) => BackendKind::Telnet,
        }
    }

    pub fn host(&self) -> &str {
        match self {
            PduConfig::Snmp(c) => &c.host,
            PduConfig::Telnet(c) => &c.host,
        }
    }

    pub fn set_host(&mut self, host: impl Into<String>) {
        match self {
            PduConfig::Snmp(c) => c.host = host.into(),
            PduConfig::Telnet(c) => c.host = host.into(),
        }
    }
}
