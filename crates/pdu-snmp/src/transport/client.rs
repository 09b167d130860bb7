//! async-snmp client transport

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_snmp::{Client, Oid, Value};
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, trace};

use super::{SnmpTransport, TransportError};
use crate::config::{SnmpConfig, SnmpVersion};
use crate::error::SnmpError;

/// One connected client per community
struct ClientPair {
    read: Client,
    write: Client,
}

/// Transport over async-snmp UDP clients.
///
/// The target is resolved and both sockets are opened on first use, then
/// shared by every request until [`SnmpTransport::disconnect`].
pub struct AgentClient {
    host: String,
    port: u16,
    version: SnmpVersion,
    read_community: String,
    write_community: String,
    timeout: Duration,
    retries: u32,
    clients: Mutex<Option<Arc<ClientPair>>>,
}

impl AgentClient {
    pub fn from_config(config: &SnmpConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            version: config.version,
            read_community: config.read_community.clone(),
            write_community: config.write_community.clone(),
            timeout: config.timeout(),
            retries: config.retries,
            clients: Mutex::new(None),
        }
    }

    async fn clients(&self) -> Result<Arc<ClientPair>, SnmpError> {
        let cached = self.clients.lock().clone();
        if let Some(pair) = cached {
            return Ok(pair);
        }

        let pair = Arc::new(self.connect().await?);
        *self.clients.lock() = Some(pair.clone());
        Ok(pair)
    }

    async fn connect(&self) -> Result<ClientPair, SnmpError> {
        let addr = tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| {
                TransportError::ConnectionFailed(format!("cannot resolve {}: {}", self.host, e))
            })?
            .next()
            .ok_or_else(|| {
                TransportError::ConnectionFailed(format!("no address for {}", self.host))
            })?;

        let read = self.open(addr, &self.read_community).await?;
        let write = self.open(addr, &self.write_community).await?;
        debug!(peer = %addr, version = ?self.version, retries = self.retries, "SNMP clients connected");
        Ok(ClientPair { read, write })
    }

    async fn open(&self, addr: SocketAddr, community: &str) -> Result<Client, SnmpError> {
        Client::builder(addr.to_string(), self.version.auth(community))
            .timeout(self.timeout)
            .retries(self.retries)
            .connect()
            .await
            .map_err(|e| {
                TransportError::ConnectionFailed(format!("cannot open socket to {}: {}", addr, e))
                    .into()
            })
    }
}

#[async_trait]
impl SnmpTransport for AgentClient {
    async fn get(&self, oid: &Oid) -> Result<Value, SnmpError> {
        let pair = self.clients().await?;
        trace!(peer = %self.target(), %oid, "SNMP get");

        let binding = pair.read.get(oid).await?;
        if &binding.oid != oid {
            return Err(SnmpError::UnexpectedResponse(format!(
                "asked for {}, agent answered {}",
                oid, binding.oid
            )));
        }
        trace!(%oid, value = %binding.value, "SNMP response");
        Ok(binding.value)
    }

    async fn set(&self, oid: &Oid, value: Value) -> Result<(), SnmpError> {
        let pair = self.clients().await?;
        trace!(peer = %self.target(), %oid, %value, "SNMP set");

        pair.write.set(oid, value).await?;
        Ok(())
    }

    async fn disconnect(&self) {
        if self.clients.lock().take().is_some() {
            debug!(peer = %self.target(), "SNMP clients released");
        }
    }

    fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
