//! Shared data types for outlet control

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PduError, PduResult};

// =============================================================================
// Outlet Commands
// =============================================================================

/// Command sent to a single outlet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutletCommand {
    /// Energize the outlet immediately
    #[serde(rename = "on", alias = "turn_on")]
    TurnOn,
    /// De-energize the outlet immediately
    #[serde(rename = "off", alias = "turn_off")]
    TurnOff,
    /// Turn the outlet off, wait the device-configured delay, then turn it back on.
    ///
    /// The delay is configured on the PDU itself; clients issue a single request
    /// and do not observe the intermediate off phase.
    Reboot,
}

impl OutletCommand {
    /// Integer written to the outlet control object over SNMP
    pub fn snmp_value(self) -> i32 {
        match self {
            OutletCommand::TurnOn => 1,
            OutletCommand::TurnOff => 2,
            OutletCommand::Reboot => 3,
        }
    }

    /// Action keyword used by the telnet `oltctrl` command
    pub fn telnet_action(self) -> &'static str {
        match self {
            OutletCommand::TurnOn => "on",
            OutletCommand::TurnOff => "off",
            OutletCommand::Reboot => "reboot",
        }
    }

    /// State the outlet settles in once the command has completed
    pub fn settled_state(self) -> bool {
        !matches!(self, OutletCommand::TurnOff)
    }
}

impl fmt::Display for OutletCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.telnet_action())
    }
}

impl FromStr for OutletCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" | "turnon" => Ok(OutletCommand::TurnOn),
            "off" | "turnoff" => Ok(OutletCommand::TurnOff),
            "reboot" | "cycle" => Ok(OutletCommand::Reboot),
            other => Err(format!(
                "Unknown outlet command: {} (expected on, off or reboot)",
                other
            )),
        }
    }
}

// =============================================================================
// Index Validation
// =============================================================================

/// Which kind of 1-based index is being validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    Outlet,
    Bank,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Outlet => f.write_str("outlet"),
            IndexKind::Bank => f.write_str("bank"),
        }
    }
}

/// Outlet and bank counts discovered once at initialization.
///
/// The counts are never re-queried for the life of a session; a PDU that is
/// reconfigured while connected keeps reporting its old inventory until the
/// session is re-initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceInventory {
    pub outlets: u32,
    pub banks: u32,
}

impl DeviceInventory {
    pub fn new(outlets: u32, banks: u32) -> Self {
        Self { outlets, banks }
    }

    /// Validate an outlet index, returning it as an unsigned wire index
    pub fn check_outlet(&self, outlet: i64) -> PduResult<u32> {
        check_index(IndexKind::Outlet, outlet, self.outlets)
    }

    /// Validate a bank index, returning it as an unsigned wire index
    pub fn check_bank(&self, bank: i64) -> PduResult<u32> {
        check_index(IndexKind::Bank, bank, self.banks)
    }

    /// All valid outlet indices in ascending order
    pub fn outlet_indices(&self) -> impl Iterator<Item = u32> {
        1..=self.outlets
    }
}

/// An index is valid iff `1 <= index <= max`
pub fn check_index(kind: IndexKind, value: i64, max: u32) -> PduResult<u32> {
    if value >= 1 && value <= i64::from(max) {
        Ok(value as u32)
    } else {
        Err(PduError::OutOfRange { kind, value, max })
    }
}
