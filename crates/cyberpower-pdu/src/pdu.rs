//! Unified PDU facade

use async_trait::async_trait;
use pdu_core::{OutletCommand, PduBackend, PduResult};
use pdu_snmp::SnmpPdu;
use pdu_telnet::TelnetPdu;
use tracing::debug;

use crate::config::{BackendKind, PduConfig};

/// Device client selected at construction
enum DeviceClient {
    Snmp(SnmpPdu),
    Telnet(TelnetPdu),
}

/// One PDU reached over exactly one wire protocol.
///
/// The protocol is chosen when the value is built and never changes. All
/// operations forward to the owned device client.
///
/// ```no_run
/// use cyberpower_pdu::{BackendKind, CyberPowerPdu, OutletCommand, PduBackend};
///
/// # async fn run() -> cyberpower_pdu::PduResult<()> {
/// let mut pdu = CyberPowerPdu::new("192.168.1.132", BackendKind::Snmp)?;
/// pdu.initialize().await?;
/// pdu.send_outlet_command(4, OutletCommand::Reboot).await?;
/// let states = pdu.get_all_outlet_states().await?;
/// pdu.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct CyberPowerPdu {
    client: DeviceClient,
}

impl CyberPowerPdu {
    /// Default settings for `kind` at `address`
    pub fn new(address: impl Into<String>, kind: BackendKind) -> PduResult<Self> {
        Self::from_config(PduConfig::new(address, kind))
    }

    pub fn from_config(config: PduConfig) -> PduResult<Self> {
        debug!(protocol = %config.kind(), host = config.host(), "Creating PDU client");
        let client = match config {
            PduConfig::Snmp(c) => DeviceClient::Snmp(SnmpPdu::new(c)?),
            PduConfig::Telnet(c) => DeviceClient::Telnet(TelnetPdu::new(c)),
        };
        Ok(Self { client })
    }

    /// Wrap an already-built SNMP client (custom transport)
    pub fn from_snmp(client: SnmpPdu) -> Self {
        Self {
            client: DeviceClient::Snmp(client),
        }
    }

    /// Wrap an already-built telnet client (custom connector)
    pub fn from_telnet(client: TelnetPdu) -> Self {
        Self {
            client: DeviceClient::Telnet(client),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self.client {
            DeviceClient::Snmp(_) => BackendKind::Snmp,
            DeviceClient::Telnet(_) => BackendKind::Telnet,
        }
    }

    pub fn as_snmp(&self) -> Option<&SnmpPdu> {
        match &self.client {
            DeviceClient::Snmp(c) => Some(c),
            DeviceClient::Telnet(_) => None,
        }
    }

    pub fn as_telnet(&self) -> Option<&TelnetPdu> {
        match &self.client {
            DeviceClient::Telnet(c) => Some(c),
            DeviceClient::Snmp(_) => None,
        }
    }

    fn backend(&self) -> &dyn PduBackend {
        match &self.client {
            DeviceClient::Snmp(c) => c,
            DeviceClient::Telnet(c) => c,
        }
    }

    fn backend_mut(&mut self) -> &mut dyn PduBackend {
        match &mut self.client {
            DeviceClient::Snmp(c) => c,
            DeviceClient::Telnet(c) => c,
        }
    }
}

#[async_trait]
impl PduBackend for CyberPowerPdu {
    fn name(&self) -> &'static str {
        self.backend().name()
    }

    async fn initialize(&mut self) -> PduResult<()> {
        self.backend_mut().initialize().await
    }

    async fn close(&mut self) -> PduResult<()> {
        self.backend_mut().close().await
    }

    fn outlet_count(&self) -> PduResult<u32> {
        self.backend().outlet_count()
    }

    fn bank_count(&self) -> PduResult<u32> {
        self.backend().bank_count()
    }

    async fn get_outlet_state(&self, outlet: i64) -> PduResult<bool> {
        self.backend().get_outlet_state(outlet).await
    }

    async fn get_all_outlet_states(&self) -> PduResult<Vec<bool>> {
        self.backend().get_all_outlet_states().await
    }

    async fn send_outlet_command(&self, outlet: i64, command: OutletCommand) -> PduResult<()> {
        self.backend().send_outlet_command(outlet, command).await
    }

    async fn get_bank_load(&self, bank: i64) -> PduResult<f64> {
        self.backend().get_bank_load(bank).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdu_core::PduError;

    #[test]
    fn test_selection_is_fixed_at_construction() {
        let snmp = CyberPowerPdu::new("10.0.0.2", BackendKind::Snmp).unwrap();
        assert_eq!(snmp.kind(), BackendKind::Snmp);
        assert_eq!(snmp.name(), "snmp");
        assert!(snmp.as_snmp().is_some());
        assert!(snmp.as_telnet().is_none());

        let telnet = CyberPowerPdu::new("10.0.0.2", BackendKind::Telnet).unwrap();
        assert_eq!(telnet.kind(), BackendKind::Telnet);
        assert_eq!(telnet.name(), "telnet");
    }

    #[test]
    fn test_bad_oid_rejected_at_construction() {
        let mut config = pdu_snmp::SnmpConfig::new("10.0.0.2");
        config.oids.bank_load = "not-an-oid".to_string();
        assert!(matches!(
            CyberPowerPdu::from_config(PduConfig::Snmp(config)),
            Err(PduError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_not_initialized_for_both_backends() {
        for kind in [BackendKind::Snmp, BackendKind::Telnet] {
            let pdu = CyberPowerPdu::new("10.0.0.2", kind).unwrap();
            assert_eq!(pdu.outlet_count(), Err(PduError::NotInitialized));
            assert_eq!(pdu.get_outlet_state(1).await, Err(PduError::NotInitialized));
            assert_eq!(pdu.get_all_outlet_states().await, Err(PduError::NotInitialized));
            assert_eq!(
                pdu.send_outlet_command(1, OutletCommand::TurnOn).await,
                Err(PduError::NotInitialized)
            );
        }
    }
}
