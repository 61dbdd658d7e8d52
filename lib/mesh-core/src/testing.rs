//! Recording endpoint states for unit tests

use crate::state::{BrokerState, EndpointState, RouterState};
use crate::{InfraError, Result};
use async_trait::async_trait;
use mesh_api::{ConnectorStatus, EndpointKind, RouterConnector};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Created { kind: EndpointKind, host: String, id: u64 },
    Shutdown { kind: EndpointKind, host: String, id: u64 },
    Initialized { host: String, id: u64 },
    Ensured { router: String, broker: String, created: bool },
    EnsureFailed { router: String, broker: String },
    Status { router: String, broker: String },
    StatusFailed { router: String, broker: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Failure {
    Initialize(String),
    Ensure(String, String),
    Status(String, String),
    Shutdown(String),
}

/// Lets a test hold the first `initialize` call until it is released
pub struct InitGate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
struct Inner {
    events: Vec<Event>,
    next_id: u64,
    failures: HashSet<Failure>,
    gate: Option<Arc<InitGate>>,
}

/// Shared log of everything the mock endpoints were asked to do
#[derive(Clone, Default)]
pub struct Recorder {
    inner: Arc<Mutex<Inner>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.inner.lock().unwrap().events.clone()
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.inner.lock().unwrap().events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap().events.clear();
    }

    pub fn clear_failures(&self) {
        self.inner.lock().unwrap().failures.clear();
    }

    pub fn fail_initialize(&self, router: &str) {
        self.add_failure(Failure::Initialize(router.to_string()));
    }

    pub fn fail_ensure(&self, router: &str, broker: &str) {
        self.add_failure(Failure::Ensure(router.to_string(), broker.to_string()));
    }

    pub fn fail_status(&self, router: &str, broker: &str) {
        self.add_failure(Failure::Status(router.to_string(), broker.to_string()));
    }

    pub fn fail_shutdown(&self, host: &str) {
        self.add_failure(Failure::Shutdown(host.to_string()));
    }

    pub fn block_initialize(&self) -> Arc<InitGate> {
        let gate = Arc::new(InitGate {
            entered: Notify::new(),
            release: Notify::new(),
        });
        self.inner.lock().unwrap().gate = Some(gate.clone());
        gate
    }

    pub fn router_factory(&self) -> impl Fn(&str, u16) -> MockRouter + Send + Sync + 'static {
        let recorder = self.clone();
        move |host: &str, port: u16| MockRouter {
            id: recorder.created(EndpointKind::Router, host),
            host: host.to_string(),
            port,
            recorder: recorder.clone(),
            initialized: false,
            connectors: HashSet::new(),
        }
    }

    pub fn broker_factory(&self) -> impl Fn(&str, u16) -> MockBroker + Send + Sync + 'static {
        let recorder = self.clone();
        move |host: &str, port: u16| MockBroker {
            id: recorder.created(EndpointKind::Broker, host),
            host: host.to_string(),
            port,
            recorder: recorder.clone(),
        }
    }

    fn add_failure(&self, failure: Failure) {
        self.inner.lock().unwrap().failures.insert(failure);
    }

    fn fails(&self, failure: &Failure) -> bool {
        self.inner.lock().unwrap().failures.contains(failure)
    }

    fn record(&self, event: Event) {
        self.inner.lock().unwrap().events.push(event);
    }

    fn created(&self, kind: EndpointKind, host: &str) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.events.push(Event::Created {
            kind,
            host: host.to_string(),
            id,
        });
        id
    }

    fn take_gate(&self) -> Option<Arc<InitGate>> {
        self.inner.lock().unwrap().gate.take()
    }

    fn shutdown(&self, kind: EndpointKind, host: &str, id: u64) -> Result<()> {
        self.record(Event::Shutdown {
            kind,
            host: host.to_string(),
            id,
        });
        if self.fails(&Failure::Shutdown(host.to_string())) {
            return Err(InfraError::Internal(format!("shutdown of {} failed", host)));
        }
        Ok(())
    }
}

pub struct MockRouter {
    pub id: u64,
    host: String,
    port: u16,
    recorder: Recorder,
    initialized: bool,
    connectors: HashSet<RouterConnector>,
}

#[async_trait]
impl EndpointState for MockRouter {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.connectors.clear();
        self.recorder.shutdown(EndpointKind::Router, &self.host, self.id)
    }
}

#[async_trait]
impl RouterState for MockRouter {
    async fn initialize(&mut self) -> Result<()> {
        if let Some(gate) = self.recorder.take_gate() {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        if self.recorder.fails(&Failure::Initialize(self.host.clone())) {
            return Err(InfraError::Connection {
                host: self.host.clone(),
                port: self.port,
                reason: "connection refused".to_string(),
            });
        }
        if !self.initialized {
            self.initialized = true;
            self.recorder.record(Event::Initialized {
                host: self.host.clone(),
                id: self.id,
            });
        }
        Ok(())
    }

    async fn ensure_connector(&mut self, connector: &RouterConnector) -> Result<()> {
        if !self.initialized {
            return Err(InfraError::NotInitialized(self.host.clone()));
        }
        if self.recorder.fails(&Failure::Ensure(self.host.clone(), connector.host.clone())) {
            self.recorder.record(Event::EnsureFailed {
                router: self.host.clone(),
                broker: connector.host.clone(),
            });
            return Err(InfraError::Management {
                host: self.host.clone(),
                reason: format!("create connector to {} rejected", connector.host),
            });
        }
        let created = self.connectors.insert(connector.clone());
        self.recorder.record(Event::Ensured {
            router: self.host.clone(),
            broker: connector.host.clone(),
            created,
        });
        Ok(())
    }

    async fn get_connector_status(&mut self, connector: &RouterConnector) -> Result<ConnectorStatus> {
        if self.recorder.fails(&Failure::Status(self.host.clone(), connector.host.clone())) {
            self.recorder.record(Event::StatusFailed {
                router: self.host.clone(),
                broker: connector.host.clone(),
            });
            return Err(InfraError::Timeout(self.host.clone()));
        }
        if !self.connectors.contains(connector) {
            return Err(InfraError::ConnectorNotFound {
                router: self.host.clone(),
                target: connector.address(),
            });
        }
        self.recorder.record(Event::Status {
            router: self.host.clone(),
            broker: connector.host.clone(),
        });
        Ok(ConnectorStatus::connected(&self.host, connector))
    }
}

pub struct MockBroker {
    pub id: u64,
    host: String,
    port: u16,
    recorder: Recorder,
}

#[async_trait]
impl EndpointState for MockBroker {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.recorder.shutdown(EndpointKind::Broker, &self.host, self.id)
    }
}

impl BrokerState for MockBroker {}

/// Build tracked maps directly, bypassing reconciliation
pub fn tracked<S>(factory: impl Fn(&str, u16) -> S, hosts: &[&str], port: u16) -> HashMap<String, S> {
    hosts
        .iter()
        .map(|host| (host.to_string(), factory(host, port)))
        .collect()
}
