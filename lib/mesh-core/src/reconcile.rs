//! Endpoint set reconciliation shared by routers and brokers

use crate::state::EndpointState;
use mesh_api::EndpointKind;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Hostnames added and removed by one reconciliation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndpointDelta {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl EndpointDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Bring `tracked` in line with `desired`.
///
/// Endpoints no longer desired are shut down and dropped, newly desired ones are
/// built with `factory(host, kind.port())`. Endpoints present on both sides keep
/// their existing state. Shutdown failures are logged and otherwise ignored.
pub async fn reconcile<S, F>(
    tracked: &mut HashMap<String, S>,
    desired: &[String],
    factory: F,
    kind: EndpointKind,
) -> EndpointDelta
where
    S: EndpointState,
    F: Fn(&str, u16) -> S,
{
    let port = kind.port();
    let desired: HashSet<&str> = desired.iter().map(String::as_str).collect();

    let mut removed: Vec<String> = tracked
        .keys()
        .filter(|host| !desired.contains(host.as_str()))
        .cloned()
        .collect();
    removed.sort();

    for host in &removed {
        if let Some(mut state) = tracked.remove(host) {
            info!("Removing {} {}:{}", kind, host, state.port());
            if let Err(e) = state.shutdown().await {
                warn!("Ignoring shutdown failure for {} {}:{}: {}", kind, host, state.port(), e);
            }
        }
    }

    let mut added: Vec<String> = desired
        .into_iter()
        .filter(|host| !tracked.contains_key(*host))
        .map(str::to_string)
        .collect();
    added.sort();

    for host in &added {
        info!("Adding {} {}:{}", kind, host, port);
        tracked.insert(host.clone(), factory(host, port));
    }

    let delta = EndpointDelta { added, removed };
    if delta.is_empty() {
        debug!("{} set unchanged ({} tracked)", kind, tracked.len());
    }
    delta
}
