//! Telnet console backend implementation

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use pdu_core::{DeviceInventory, OutletCommand, PduBackend, PduError, PduResult};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::TelnetConfig;
use crate::connector::{BoxedStream, StreamConnector, TcpConnector};
use crate::error::TelnetError;
use crate::parser::{parse_status, state_map, OutletStatus};
use crate::session::TelnetSession;

const STATUS_COMMAND: &str = "oltsta show";
const EXIT_COMMAND: &str = "exit";

/// Logged-in console plus bookkeeping
struct Console {
    session: TelnetSession<BoxedStream>,
    /// Outlet commands whose trailing prompt has not been consumed
    unread_prompts: usize,
    /// Names from the most recent status page
    names: BTreeMap<u32, String>,
}

impl Console {
    /// Query the status table, re-querying while the page has no rows
    async fn query_status(
        &mut self,
        prompt: &str,
        attempts: u32,
    ) -> Result<Vec<OutletStatus>, TelnetError> {
        while self.unread_prompts > 0 {
            self.session.read_until(prompt).await?;
            self.unread_prompts -= 1;
        }

        let attempts = attempts.max(1);
        for attempt in 1..=attempts {
            self.session.write_line(STATUS_COMMAND).await?;
            let page = self.session.read_until(prompt).await?;
            let rows = parse_status(&page);
            if !rows.is_empty() {
                debug!(rows = rows.len(), attempt, "Status page parsed");
                self.names = rows.iter().map(|r| (r.index, r.name.clone())).collect();
                return Ok(rows);
            }
            warn!(attempt, attempts, "Status page had no outlet rows, re-querying");
        }
        Err(TelnetError::StatusUnavailable { attempts })
    }
}

/// PDU client driving the interactive telnet console.
///
/// One TCP connection carries every operation. Calls are serialized on an
/// internal lock; reads have no timeout, so callers wanting a deadline should
/// wrap calls in `tokio::time::timeout` and close the session on expiry.
pub struct TelnetPdu {
    config: TelnetConfig,
    connector: Arc<dyn StreamConnector>,
    console: Mutex<Option<Console>>,
    inventory: Option<DeviceInventory>,
}

impl TelnetPdu {
    /// Create a backend connecting over TCP to `config.host`
    pub fn new(config: TelnetConfig) -> Self {
        let connector = Arc::new(TcpConnector::from_config(&config));
        Self::with_connector(config, connector)
    }

    /// Create a backend over a caller-supplied connector
    pub fn with_connector(config: TelnetConfig, connector: Arc<dyn StreamConnector>) -> Self {
        Self {
            config,
            connector,
            console: Mutex::new(None),
            inventory: None,
        }
    }

    pub fn config(&self) -> &TelnetConfig {
        &self.config
    }

    /// Current status table, including outlet names
    pub async fn outlet_status(&self) -> PduResult<Vec<OutletStatus>> {
        self.inventory()?;
        let mut guard = self.console.lock().await;
        let console = guard.as_mut().ok_or(PduError::NotInitialized)?;
        Ok(self.query(console).await?)
    }

    /// Outlet names as printed by the device on the most recent status page
    pub async fn outlet_names(&self) -> PduResult<BTreeMap<u32, String>> {
        self.inventory()?;
        let guard = self.console.lock().await;
        let console = guard.as_ref().ok_or(PduError::NotInitialized)?;
        Ok(console.names.clone())
    }

    fn inventory(&self) -> PduResult<DeviceInventory> {
        self.inventory.ok_or(PduError::NotInitialized)
    }

    async fn query(&self, console: &mut Console) -> Result<Vec<OutletStatus>, TelnetError> {
        console
            .query_status(&self.config.prompts.command, self.config.status_query_attempts)
            .await
    }
}

#[async_trait]
impl PduBackend for TelnetPdu {
    fn name(&self) -> &'static str {
        "telnet"
    }

    async fn initialize(&mut self) -> PduResult<()> {
        let target = self.connector.target();
        info!(peer = %target, "Initializing telnet session");

        let stream = self
            .connector
            .connect()
            .await
            .map_err(|e| PduError::Connection(e.to_string()))?;
        let mut session = TelnetSession::new(stream);
        session
            .login(&self.config.username, &self.config.password, &self.config.prompts)
            .await
            .map_err(|e| PduError::Connection(e.to_string()))?;

        let mut console = Console {
            session,
            unread_prompts: 0,
            names: BTreeMap::new(),
        };
        let rows = self
            .query(&mut console)
            .await
            .map_err(|e| PduError::Protocol(format!("unable to retrieve outlet count: {}", e)))?;

        let inventory = DeviceInventory::new(rows.len() as u32, 0);
        *self.console.get_mut() = Some(console);
        self.inventory = Some(inventory);
        info!(peer = %target, outlets = inventory.outlets, "Telnet session ready");
        Ok(())
    }

    async fn close(&mut self) -> PduResult<()> {
        self.inventory = None;
        let Some(mut console) = self.console.get_mut().take() else {
            return Ok(());
        };

        console.session.write_line(EXIT_COMMAND).await?;
        console.session.read_to_end().await?;
        info!(peer = %self.connector.target(), "Telnet session closed");
        Ok(())
    }

    fn outlet_count(&self) -> PduResult<u32> {
        Ok(self.inventory()?.outlets)
    }

    async fn get_outlet_state(&self, outlet: i64) -> PduResult<bool> {
        let index = self.inventory()?.check_outlet(outlet)?;
        let mut guard = self.console.lock().await;
        let console = guard.as_mut().ok_or(PduError::NotInitialized)?;

        let rows = self.query(console).await?;
        let state = rows
            .iter()
            .find(|row| row.index == index)
            .map(|row| row.state)
            .ok_or(TelnetError::MissingOutlet(index))?;
        debug!(outlet = index, state, "Outlet state read");
        Ok(state)
    }

    async fn get_all_outlet_states(&self) -> PduResult<Vec<bool>> {
        let inventory = self.inventory()?;
        let mut guard = self.console.lock().await;
        let console = guard.as_mut().ok_or(PduError::NotInitialized)?;

        // One page answers every outlet
        let states = state_map(&self.query(console).await?);
        inventory
            .outlet_indices()
            .map(|index| {
                states
                    .get(&index)
                    .copied()
                    .ok_or_else(|| TelnetError::MissingOutlet(index).into())
            })
            .collect()
    }

    async fn send_outlet_command(&self, outlet: i64, command: OutletCommand) -> PduResult<()> {
        let index = self.inventory()?.check_outlet(outlet)?;
        let mut guard = self.console.lock().await;
        let console = guard.as_mut().ok_or(PduError::NotInitialized)?;

        info!(outlet = index, %command, "Sending outlet command");
        let line = format!("oltctrl index {} act {}", index, command.telnet_action());
        console.session.write_line(&line).await?;
        console.unread_prompts += 1;
        Ok(())
    }
}
