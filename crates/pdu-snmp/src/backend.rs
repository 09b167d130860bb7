//! SNMP backend implementation

use std::sync::Arc;

use async_snmp::{Oid, Value};
use async_trait::async_trait;
use pdu_core::{DeviceInventory, OutletCommand, PduBackend, PduError, PduResult};
use tracing::{debug, info, instrument};

use crate::config::{parse_oid, SnmpConfig};
use crate::error::SnmpError;
use crate::transport::{AgentClient, SnmpTransport};
use crate::value::{decode_value, DecodedValue};

/// Parsed object identifiers for one device
#[derive(Debug, Clone)]
struct DeviceOids {
    outlet_count: Oid,
    bank_count: Oid,
    outlet_state: Oid,
    outlet_command: Oid,
    bank_load: Oid,
}

impl DeviceOids {
    fn from_config(config: &SnmpConfig) -> Result<Self, SnmpError> {
        Ok(Self {
            outlet_count: parse_oid(&config.oids.outlet_count)?,
            bank_count: parse_oid(&config.oids.bank_count)?,
            outlet_state: parse_oid(&config.oids.outlet_state)?,
            outlet_command: parse_oid(&config.oids.outlet_command)?,
            bank_load: parse_oid(&config.oids.bank_load)?,
        })
    }
}

/// PDU client speaking SNMP v1/v2c.
///
/// Reads use the read community, outlet commands the write community. Each
/// operation is a single request/response exchange; the only session state
/// is the inventory captured by `initialize`.
pub struct SnmpPdu {
    config: SnmpConfig,
    oids: DeviceOids,
    transport: Arc<dyn SnmpTransport>,
    inventory: Option<DeviceInventory>,
}

impl SnmpPdu {
    /// Create a backend talking UDP to `config.host`
    pub fn new(config: SnmpConfig) -> PduResult<Self> {
        let transport = Arc::new(AgentClient::from_config(&config));
        Self::with_transport(config, transport)
    }

    /// Create a backend over a caller-supplied transport
    pub fn with_transport(config: SnmpConfig, transport: Arc<dyn SnmpTransport>) -> PduResult<Self> {
        let oids = DeviceOids::from_config(&config)?;
        Ok(Self {
            config,
            oids,
            transport,
            inventory: None,
        })
    }

    pub fn config(&self) -> &SnmpConfig {
        &self.config
    }

    /// Read an arbitrary object and decode it to an integer or text
    pub async fn query(&self, oid: &Oid) -> PduResult<DecodedValue> {
        self.inventory()?;
        let value = self.transport.get(oid).await?;
        Ok(decode_value(&value)?)
    }

    fn inventory(&self) -> PduResult<DeviceInventory> {
        self.inventory.ok_or(PduError::NotInitialized)
    }

    async fn get_integer(&self, oid: &Oid) -> Result<i64, SnmpError> {
        match decode_value(&self.transport.get(oid).await?)? {
            DecodedValue::Integer(value) => Ok(value),
            DecodedValue::Text(text) => Err(SnmpError::UnsupportedType(format!(
                "Expected an integer response from {} and received '{}' instead",
                oid, text
            ))),
        }
    }

    async fn get_count(&self, oid: &Oid, what: &str) -> PduResult<u32> {
        let raw = self.get_integer(oid).await.map_err(|e| initialize_error(e, what))?;
        u32::try_from(raw)
            .map_err(|_| PduError::Protocol(format!("device reported {} {}", raw, what)))
    }
}

/// Failures while discovering the inventory. An agent that cannot be
/// reached or never answers is a connection error; a reply that cannot be
/// used means the counts could not be read.
fn initialize_error(err: SnmpError, what: &str) -> PduError {
    match err {
        SnmpError::Transport(transport) => {
            PduError::Connection(format!("unable to retrieve {}: {}", what, transport))
        }
        other => PduError::Protocol(format!("unable to retrieve {}: {}", what, other)),
    }
}

/// Outlet state object: 1 = on, 2 = off
pub fn decode_outlet_state(raw: i64) -> Result<bool, SnmpError> {
    match raw {
        1 => Ok(true),
        2 => Ok(false),
        other => Err(SnmpError::UnexpectedValue(format!(
            "Received unexpected value for outlet state: {}",
            other
        ))),
    }
}

/// Bank load object is reported in tenths of an amp
pub fn decode_bank_load(raw: i64) -> Result<f64, SnmpError> {
    if raw < 0 {
        return Err(SnmpError::UnexpectedValue(format!(
            "Received negative bank load: {}",
            raw
        )));
    }
    Ok(raw as f64 / 10.0)
}

#[async_trait]
impl PduBackend for SnmpPdu {
    fn name(&self) -> &'static str {
        "snmp"
    }

    #[instrument(skip(self), fields(host = %self.config.host))]
    async fn initialize(&mut self) -> PduResult<()> {
        info!(port = self.config.port, version = ?self.config.version, "Initializing SNMP session");

        let banks = self.get_count(&self.oids.bank_count, "bank count").await?;
        let outlets = self.get_count(&self.oids.outlet_count, "outlet count").await?;

        self.inventory = Some(DeviceInventory::new(outlets, banks));
        info!(outlets, banks, "SNMP session ready");
        Ok(())
    }

    async fn close(&mut self) -> PduResult<()> {
        if self.inventory.take().is_some() {
            debug!(host = %self.config.host, "SNMP session closed");
        }
        self.transport.disconnect().await;
        Ok(())
    }

    fn outlet_count(&self) -> PduResult<u32> {
        Ok(self.inventory()?.outlets)
    }

    fn bank_count(&self) -> PduResult<u32> {
        Ok(self.inventory()?.banks)
    }

    async fn get_outlet_state(&self, outlet: i64) -> PduResult<bool> {
        let index = self.inventory()?.check_outlet(outlet)?;
        let raw = self.get_integer(&self.oids.outlet_state.child(index)).await?;
        let state = decode_outlet_state(raw)?;
        debug!(outlet = index, state, "Outlet state read");
        Ok(state)
    }

    async fn send_outlet_command(&self, outlet: i64, command: OutletCommand) -> PduResult<()> {
        let index = self.inventory()?.check_outlet(outlet)?;
        info!(outlet = index, %command, "Sending outlet command");
        self.transport
            .set(
                &self.oids.outlet_command.child(index),
                Value::Integer(command.snmp_value()),
            )
            .await?;
        Ok(())
    }

    async fn get_bank_load(&self, bank: i64) -> PduResult<f64> {
        let index = self.inventory()?.check_bank(bank)?;
        let raw = self.get_integer(&self.oids.bank_load.child(index)).await?;
        Ok(decode_bank_load(raw)?)
    }
}
