//! In-process SNMP agent for testing
//!
//! Answers get and set requests from an OID table with CyberPower outlet
//! semantics, so the backend is exercised end to end without a network.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_snmp::{ErrorStatus, Oid, Value, VarBind};
use async_trait::async_trait;
use parking_lot::RwLock;

use super::{SnmpTransport, TransportError};
use crate::config::{parse_oid, SnmpOids, SnmpVersion};
use crate::error::SnmpError;

/// Outlet table wiring: writes under `command` update `state`
#[derive(Debug, Clone)]
struct OutletTable {
    command: Oid,
    state: Oid,
}

/// Mock agent implementing [`SnmpTransport`]
pub struct MockAgent {
    values: RwLock<BTreeMap<Oid, Value>>,
    version: SnmpVersion,
    outlets: Option<OutletTable>,
    online: AtomicBool,
    exchanges: AtomicUsize,
    /// Failure returned by the next request, once
    forced_error: RwLock<Option<SnmpError>>,
    set_log: RwLock<Vec<VarBind>>,
}

impl Default for MockAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAgent {
    /// Empty SNMPv1 agent
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            version: SnmpVersion::V1,
            outlets: None,
            online: AtomicBool::new(true),
            exchanges: AtomicUsize::new(0),
            forced_error: RwLock::new(None),
            set_log: RwLock::new(Vec::new()),
        }
    }

    /// Agent populated like a CyberPower PDU using the default object identifiers.
    ///
    /// All outlets start off and every bank reports zero load.
    pub fn cyberpower(outlets: u32, banks: u32) -> Self {
        Self::with_oids(&SnmpOids::default(), outlets, banks).unwrap_or_else(|_| Self::new())
    }

    /// Agent populated like a CyberPower PDU using custom object identifiers
    pub fn with_oids(oids: &SnmpOids, outlets: u32, banks: u32) -> Result<Self, SnmpError> {
        let outlet_count = parse_oid(&oids.outlet_count)?;
        let bank_count = parse_oid(&oids.bank_count)?;
        let state = parse_oid(&oids.outlet_state)?;
        let command = parse_oid(&oids.outlet_command)?;
        let bank_load = parse_oid(&oids.bank_load)?;

        let mut values = BTreeMap::new();
        values.insert(outlet_count, Value::Integer(count(outlets)));
        values.insert(bank_count, Value::Integer(count(banks)));
        for outlet in 1..=outlets {
            values.insert(state.child(outlet), Value::Integer(2));
            values.insert(command.child(outlet), Value::Integer(2));
        }
        for bank in 1..=banks {
            values.insert(bank_load.child(bank), Value::Gauge32(0));
        }

        let mut agent = Self::new();
        agent.values = RwLock::new(values);
        agent.outlets = Some(OutletTable { command, state });
        Ok(agent)
    }

    /// Answer missing objects the way a v2c agent does (noSuchInstance)
    pub fn with_version(mut self, version: SnmpVersion) -> Self {
        self.version = version;
        self
    }

    /// Insert or replace a value
    pub fn insert(&self, oid: Oid, value: Value) {
        self.values.write().insert(oid, value);
    }

    /// Remove a value so lookups fail
    pub fn remove(&self, oid: &Oid) {
        self.values.write().remove(oid);
    }

    pub fn value(&self, oid: &Oid) -> Option<Value> {
        self.values.read().get(oid).cloned()
    }

    /// An offline agent never answers; every request times out
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Answer the next request with this error status
    pub fn fail_next_with(&self, status: ErrorStatus) {
        self.fail_next(SnmpError::ErrorStatus { status, index: 1 });
    }

    /// Fail the next request with this error
    pub fn fail_next(&self, err: SnmpError) {
        *self.forced_error.write() = Some(err);
    }

    /// Number of requests received, answered or not
    pub fn exchange_count(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }

    /// Every accepted set binding in arrival order
    pub fn set_requests(&self) -> Vec<VarBind> {
        self.set_log.read().clone()
    }

    /// Bookkeeping shared by get and set
    fn begin(&self) -> Result<(), SnmpError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);

        if !self.online.load(Ordering::SeqCst) {
            return Err(TransportError::Timeout("agent offline".to_string()).into());
        }
        match self.forced_error.write().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn count(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

fn status(status: ErrorStatus) -> SnmpError {
    SnmpError::ErrorStatus { status, index: 1 }
}

#[async_trait]
impl SnmpTransport for MockAgent {
    async fn get(&self, oid: &Oid) -> Result<Value, SnmpError> {
        self.begin()?;

        match (self.values.read().get(oid), self.version) {
            (Some(value), _) => Ok(value.clone()),
            (None, SnmpVersion::V1) => Err(status(ErrorStatus::NoSuchName)),
            (None, SnmpVersion::V2c) => Ok(Value::NoSuchInstance),
        }
    }

    async fn set(&self, oid: &Oid, value: Value) -> Result<(), SnmpError> {
        self.begin()?;

        let mut values = self.values.write();
        if !values.contains_key(oid) {
            return Err(status(ErrorStatus::NoSuchName));
        }
        let Some(table) = self.outlets.as_ref().filter(|t| oid.starts_with(&t.command)) else {
            return Err(status(ErrorStatus::ReadOnly));
        };
        let new_state = match value {
            Value::Integer(1) | Value::Integer(3) => 1,
            Value::Integer(2) => 2,
            _ => return Err(status(ErrorStatus::BadValue)),
        };
        if let Some(outlet) = oid.arcs().last() {
            values.insert(table.state.child(*outlet), Value::Integer(new_state));
        }
        values.insert(oid.clone(), value.clone());
        self.set_log.write().push(VarBind::new(oid.clone(), value));
        Ok(())
    }

    fn target(&self) -> String {
        "mock-agent".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const STATE_BASE: &str = "1.3.6.1.4.1.3808.1.1.3.3.5.1.1.4";
    const COMMAND_BASE: &str = "1.3.6.1.4.1.3808.1.1.3.3.3.1.1.4";

    fn state(outlet: u32) -> Oid {
        parse_oid(STATE_BASE).unwrap().child(outlet)
    }

    fn command(outlet: u32) -> Oid {
        parse_oid(COMMAND_BASE).unwrap().child(outlet)
    }

    #[tokio::test]
    async fn test_get_known_value() {
        let agent = MockAgent::cyberpower(8, 1);
        assert_eq!(agent.get(&state(3)).await.unwrap(), Value::Integer(2));
    }

    #[tokio::test]
    async fn test_get_unknown_value_v1_and_v2c() {
        let v1 = MockAgent::cyberpower(8, 1);
        assert!(matches!(
            v1.get(&state(9)).await,
            Err(SnmpError::ErrorStatus {
                status: ErrorStatus::NoSuchName,
                ..
            })
        ));

        let v2 = MockAgent::cyberpower(8, 1).with_version(SnmpVersion::V2c);
        assert_eq!(v2.get(&state(9)).await.unwrap(), Value::NoSuchInstance);
    }

    #[tokio::test]
    async fn test_set_command_updates_state() {
        let agent = MockAgent::cyberpower(8, 1);

        agent.set(&command(4), Value::Integer(3)).await.unwrap();

        assert_eq!(agent.value(&state(4)), Some(Value::Integer(1)));
        assert_eq!(
            agent.set_requests(),
            vec![VarBind::new(command(4), Value::Integer(3))]
        );
    }

    #[tokio::test]
    async fn test_set_bad_value_and_read_only() {
        let agent = MockAgent::cyberpower(8, 1);

        assert!(matches!(
            agent.set(&command(1), Value::Integer(9)).await,
            Err(SnmpError::ErrorStatus {
                status: ErrorStatus::BadValue,
                ..
            })
        ));
        assert!(matches!(
            agent.set(&state(1), Value::Integer(1)).await,
            Err(SnmpError::ErrorStatus {
                status: ErrorStatus::ReadOnly,
                ..
            })
        ));
        assert!(agent.set_requests().is_empty());
    }

    #[tokio::test]
    async fn test_offline_agent_times_out() {
        let agent = MockAgent::cyberpower(8, 1);
        agent.set_online(false);

        let result = agent.get(&state(1)).await;
        assert!(matches!(
            result,
            Err(SnmpError::Transport(TransportError::Timeout(_)))
        ));
        assert_eq!(agent.exchange_count(), 1);
    }

    #[tokio::test]
    async fn test_forced_error_is_one_shot() {
        let agent = MockAgent::cyberpower(8, 1);
        agent.fail_next_with(ErrorStatus::GenErr);

        assert!(agent.get(&state(1)).await.is_err());
        assert_eq!(agent.get(&state(1)).await.unwrap(), Value::Integer(2));
        assert_eq!(agent.exchange_count(), 2);
    }
}
