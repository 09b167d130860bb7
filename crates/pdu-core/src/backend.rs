//! PduBackend trait - the operation set shared by every PDU client

use async_trait::async_trait;

use crate::error::{PduError, PduResult};
use crate::models::OutletCommand;

/// Outlet-control operations implemented by each wire protocol.
///
/// A backend owns its device session exclusively. `initialize` must complete
/// before any other operation; every operation issued before it, or after
/// `close`, fails with [`PduError::NotInitialized`]. Outlet and bank indices
/// are 1-based and validated against the inventory captured at initialization
/// before any I/O is attempted.
#[async_trait]
pub trait PduBackend: Send + Sync {
    /// Short backend name used in logs ("snmp", "telnet", ...)
    fn name(&self) -> &'static str;

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// Establish the session and discover the outlet/bank inventory
    async fn initialize(&mut self) -> PduResult<()>;

    /// Release the session. Calling twice is backend-defined.
    async fn close(&mut self) -> PduResult<()>;

    /// Number of controllable outlets discovered at initialization
    fn outlet_count(&self) -> PduResult<u32>;

    /// Number of power banks discovered at initialization
    fn bank_count(&self) -> PduResult<u32> {
        Err(PduError::UnsupportedOperation(format!(
            "bank_count over {}",
            self.name()
        )))
    }

    // =========================================================================
    // Outlets
    // =========================================================================

    /// Read one outlet. `true` means energized.
    async fn get_outlet_state(&self, outlet: i64) -> PduResult<bool>;

    /// Read every outlet. Element `k` holds the state of outlet `k + 1`.
    async fn get_all_outlet_states(&self) -> PduResult<Vec<bool>> {
        let count = self.outlet_count()?;
        let mut states = Vec::with_capacity(count as usize);
        for outlet in 1..=i64::from(count) {
            states.push(self.get_outlet_state(outlet).await?);
        }
        Ok(states)
    }

    /// Send a command to one outlet. The device acknowledgement is not awaited.
    async fn send_outlet_command(&self, outlet: i64, command: OutletCommand) -> PduResult<()>;

    // =========================================================================
    // Banks
    // =========================================================================

    /// Aggregate current draw of a bank, in amps
    async fn get_bank_load(&self, bank: i64) -> PduResult<f64> {
        let _ = bank;
        Err(PduError::UnsupportedOperation(format!(
            "get_bank_load over {}",
            self.name()
        )))
    }
}
