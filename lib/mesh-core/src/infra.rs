//! InfraClient owns the tracked routers and brokers and runs synchronization cycles

use crate::reconcile::reconcile;
use crate::state::{BrokerState, RouterState, StateFactory};
use crate::topology::synchronize;
use crate::Result;
use mesh_api::{ConnectorStatus, EndpointKind};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Endpoints tracked between cycles, keyed by hostname
struct TrackedEndpoints<R, B> {
    routers: HashMap<String, R>,
    brokers: HashMap<String, B>,
}

/// InfraClient keeps routers connected to every broker.
///
/// Both tracked maps sit behind one lock that is held for the whole of
/// [`sync_connectors`](Self::sync_connectors) and [`shutdown`](Self::shutdown),
/// so cycles never interleave with each other or with shutdown.
pub struct InfraClient<R, B> {
    tracked: Mutex<TrackedEndpoints<R, B>>,
    router_factory: StateFactory<R>,
    broker_factory: StateFactory<B>,
}

impl<R, B> InfraClient<R, B>
where
    R: RouterState,
    B: BrokerState,
{
    pub fn new<RF, BF>(router_factory: RF, broker_factory: BF) -> Self
    where
        RF: Fn(&str, u16) -> R + Send + Sync + 'static,
        BF: Fn(&str, u16) -> B + Send + Sync + 'static,
    {
        Self {
            tracked: Mutex::new(TrackedEndpoints {
                routers: HashMap::new(),
                brokers: HashMap::new(),
            }),
            router_factory: Arc::new(router_factory),
            broker_factory: Arc::new(broker_factory),
        }
    }

    /// Run one synchronization cycle against the desired routers and brokers.
    ///
    /// Returns one status per (router, broker) pair. Any initialize, ensure or
    /// status failure ends the cycle with that error and no statuses; endpoint
    /// changes already applied are kept.
    pub async fn sync_connectors(
        &self,
        routers: &[String],
        brokers: &[String],
    ) -> Result<Vec<ConnectorStatus>> {
        let mut guard = self.tracked.lock().await;
        let tracked = &mut *guard;

        let router_delta = reconcile(&mut tracked.routers, routers, &*self.router_factory, EndpointKind::Router).await;
        let broker_delta = reconcile(&mut tracked.brokers, brokers, &*self.broker_factory, EndpointKind::Broker).await;
        debug!("Router delta: {:?}, broker delta: {:?}", router_delta, broker_delta);

        for router in tracked.routers.values_mut() {
            router.initialize().await?;
        }

        let statuses = synchronize(&mut tracked.routers, &tracked.brokers).await?;

        info!(
            "State synchronization complete with {} routers and {} brokers",
            tracked.routers.len(),
            tracked.brokers.len()
        );
        Ok(statuses)
    }

    /// Shut down every tracked router.
    ///
    /// Routers are dropped once shut down, so a later cycle rebuilds them through
    /// the factory. Brokers stay tracked and are left running. Router shutdown
    /// failures are logged and never returned.
    pub async fn shutdown(&self) -> Result<()> {
        let mut tracked = self.tracked.lock().await;

        for (host, mut router) in tracked.routers.drain() {
            debug!("Shutting down router {}", host);
            if let Err(e) = router.shutdown().await {
                warn!("Ignoring shutdown failure for router {}: {}", host, e);
            }
        }

        info!("Shut down routers, {} brokers remain tracked", tracked.brokers.len());
        Ok(())
    }

    /// Hostnames of the tracked routers, sorted
    pub async fn router_hosts(&self) -> Vec<String> {
        let tracked = self.tracked.lock().await;
        sorted(tracked.routers.keys())
    }

    /// Hostnames of the tracked brokers, sorted
    pub async fn broker_hosts(&self) -> Vec<String> {
        let tracked = self.tracked.lock().await;
        sorted(tracked.brokers.keys())
    }
}

fn sorted<'a>(hosts: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut hosts: Vec<String> = hosts.cloned().collect();
    hosts.sort();
    hosts
}
