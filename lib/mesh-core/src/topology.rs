//! Connector topology synchronization
//!
//! Drives every tracked router towards holding one connector per tracked broker.

use crate::state::{BrokerState, RouterState};
use crate::Result;
use mesh_api::{ConnectorStatus, RouterConnector};
use std::collections::HashMap;
use tracing::debug;

/// Ensure a connector from every router to every broker and collect their status.
///
/// Routers must already be initialized. The first failing ensure or status call
/// aborts the whole pass and its error is returned as is. Connectors created for
/// earlier pairs are left in place.
pub async fn synchronize<R, B>(
    routers: &mut HashMap<String, R>,
    brokers: &HashMap<String, B>,
) -> Result<Vec<ConnectorStatus>>
where
    R: RouterState,
    B: BrokerState,
{
    let mut statuses = Vec::with_capacity(routers.len() * brokers.len());

    for broker in brokers.values() {
        let connector = RouterConnector::for_broker(broker.host(), broker.port());

        for router in routers.values_mut() {
            router.ensure_connector(&connector).await?;

            let status = router.get_connector_status(&connector).await?;
            debug!(
                "Connector {} -> {} connected={}",
                router.host(),
                connector.address(),
                status.connected
            );
            statuses.push(status);
        }
    }

    Ok(statuses)
}
