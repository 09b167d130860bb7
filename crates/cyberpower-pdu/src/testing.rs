//! In-memory PDU for exercising callers without hardware

use async_trait::async_trait;
use parking_lot::RwLock;
use pdu_core::{DeviceInventory, OutletCommand, PduBackend, PduError, PduResult};
use tracing::{debug, info};

/// Current drawn by one energized outlet, in amps
const AMPS_PER_OUTLET: f64 = 0.5;

/// Simulated PDU implementing [`PduBackend`].
///
/// Outlets start off at every `initialize`. Banks split the outlets into
/// contiguous groups and report `0.5 A` per energized outlet in the group.
pub struct SimulatedPdu {
    outlets: u32,
    banks: u32,
    inventory: Option<DeviceInventory>,
    states: RwLock<Vec<bool>>,
}

impl Default for SimulatedPdu {
    fn default() -> Self {
        Self::new(16, 2)
    }
}

impl SimulatedPdu {
    pub fn new(outlets: u32, banks: u32) -> Self {
        Self {
            outlets,
            banks,
            inventory: None,
            states: RwLock::new(Vec::new()),
        }
    }

    fn inventory(&self) -> PduResult<DeviceInventory> {
        self.inventory.ok_or(PduError::NotInitialized)
    }

    /// Outlet indices (1-based, inclusive) wired to `bank`
    fn bank_span(&self, bank: u32) -> (u32, u32) {
        let per_bank = self.outlets.div_ceil(self.banks.max(1));
        let first = (bank - 1) * per_bank + 1;
        let last = (bank * per_bank).min(self.outlets);
        (first, last)
    }
}

#[async_trait]
impl PduBackend for SimulatedPdu {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn initialize(&mut self) -> PduResult<()> {
        *self.states.write() = vec![false; self.outlets as usize];
        self.inventory = Some(DeviceInventory::new(self.outlets, self.banks));
        info!(outlets = self.outlets, banks = self.banks, "Simulated PDU initialized");
        Ok(())
    }

    async fn close(&mut self) -> PduResult<()> {
        self.inventory = None;
        info!("Simulated PDU closed");
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
        Ok(self.states.read()[index as usize - 1])
    }

    async fn get_all_outlet_states(&self) -> PduResult<Vec<bool>> {
        self.inventory()?;
        Ok(self.states.read().clone())
    }

    async fn send_outlet_command(&self, outlet: i64, command: OutletCommand) -> PduResult<()> {
        let index = self.inventory()?.check_outlet(outlet)?;
        debug!(outlet = index, %command, "Simulated outlet command");
        self.states.write()[index as usize - 1] = command.settled_state();
        Ok(())
    }

    async fn get_bank_load(&self, bank: i64) -> PduResult<f64> {
        let bank = self.inventory()?.check_bank(bank)?;
        let (first, last) = self.bank_span(bank);
        let states = self.states.read();
        let energized = (first..=last)
            .filter(|&outlet| states[outlet as usize - 1])
            .count();
        Ok(energized as f64 * AMPS_PER_OUTLET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    async fn ready() -> SimulatedPdu {
        let mut pdu = SimulatedPdu::default();
        pdu.initialize().await.unwrap();
        pdu
    }

    #[tokio::test]
    async fn test_defaults() {
        let pdu = ready().await;
        assert_eq!(pdu.outlet_count(), Ok(16));
        assert_eq!(pdu.bank_count(), Ok(2));
        assert_eq!(pdu.get_all_outlet_states().await.unwrap(), vec![false; 16]);
    }

    #[rstest]
    #[case(OutletCommand::TurnOn, true)]
    #[case(OutletCommand::TurnOff, false)]
    #[case(OutletCommand::Reboot, true)]
    #[tokio::test]
    async fn test_command_settles(#[case] command: OutletCommand, #[case] expected: bool) {
        let pdu = ready().await;
        pdu.send_outlet_command(5, command).await.unwrap();
        assert_eq!(pdu.get_outlet_state(5).await, Ok(expected));
    }

    #[tokio::test]
    async fn test_bank_load_follows_outlets() {
        let pdu = ready().await;
        assert_eq!(pdu.get_bank_load(1).await, Ok(0.0));

        pdu.send_outlet_command(1, OutletCommand::TurnOn).await.unwrap();
        pdu.send_outlet_command(2, OutletCommand::TurnOn).await.unwrap();
        pdu.send_outlet_command(16, OutletCommand::TurnOn).await.unwrap();

        assert_eq!(pdu.get_bank_load(1).await, Ok(1.0));
        assert_eq!(pdu.get_bank_load(2).await, Ok(0.5));
        assert_eq!(
            pdu.get_bank_load(3).await,
            Err(PduError::bank_out_of_range(3, 2))
        );
    }

    #[tokio::test]
    async fn test_uneven_banks() {
        let mut pdu = SimulatedPdu::new(5, 2);
        pdu.initialize().await.unwrap();
        for outlet in 1..=5 {
            pdu.send_outlet_command(outlet, OutletCommand::TurnOn).await.unwrap();
        }
        assert_eq!(pdu.get_bank_load(1).await, Ok(1.5));
        assert_eq!(pdu.get_bank_load(2).await, Ok(1.0));
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let mut pdu = SimulatedPdu::new(4, 1);
        assert_eq!(pdu.get_outlet_state(1).await, Err(PduError::NotInitialized));

        pdu.initialize().await.unwrap();
        pdu.send_outlet_command(4, OutletCommand::TurnOn).await.unwrap();
        assert_eq!(
            pdu.send_outlet_command(5, OutletCommand::TurnOn).await,
            Err(PduError::outlet_out_of_range(5, 4))
        );

        pdu.close().await.unwrap();
        assert_eq!(pdu.outlet_count(), Err(PduError::NotInitialized));

        pdu.initialize().await.unwrap();
        assert_eq!(pdu.get_outlet_state(4).await, Ok(false));
    }
}
