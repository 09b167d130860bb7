//! Configuration file handling for pdu-cli
//!
//! ```toml
//! output = "json"
//!
//! [pdu]
//! protocol = "telnet"
//! host = "192.168.1.132"
//! username = "cyber"
//! password = "cyber"
//! ```

use anyhow::{bail, Context, Result};
use cyberpower_pdu::{BackendKind, PduConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default output format
    pub output: Option<String>,
    /// Disable colored output
    pub no_color: Option<bool>,
    /// Device connection settings
    pub pdu: Option<PduConfig>,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("pdu-cli");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values.
    ///
    /// A protocol given on the command line that differs from the file's
    /// replaces the file's device section with that protocol's defaults.
    pub fn merge_with_args(
        &self,
        host: Option<&str>,
        protocol: Option<BackendKind>,
        output: Option<&str>,
        no_color: bool,
    ) -> Result<MergedConfig> {
        let mut pdu = match (&self.pdu, protocol) {
            (Some(file), Some(kind)) if file.kind() != kind => {
                PduConfig::new(host.unwrap_or(file.host()), kind)
            }
            (Some(file), _) => file.clone(),
            (None, kind) => match host {
                Some(host) => PduConfig::new(host, kind.unwrap_or(BackendKind::Snmp)),
                None => bail!(
                    "No PDU host configured (use --host, CYBERPOWER_PDU_HOST or the [pdu] section of {})",
                    Self::config_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|_| "the config file".to_string())
                ),
            },
        };
        if let Some(host) = host {
            pdu.set_host(host);
        }

        Ok(MergedConfig {
            pdu,
            output: output
                .map(String::from)
                .or_else(|| self.output.clone())
                .unwrap_or_else(|| "table".to_string()),
            no_color: no_color || self.no_color.unwrap_or(false),
        })
    }
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub pdu: PduConfig,
    pub output: String,
    pub no_color: bool,
}
