use anyhow::Result;
use mesh_api::ConnectorStatus;
use mesh_core::{BrokerState, InfraClient, RouterState};
use std::future::Future;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod probe;

use config::ControllerConfig;
use probe::{ProbeBrokerState, ProbeRouterState};

type MeshClient = InfraClient<ProbeRouterState, ProbeBrokerState>;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting mesh-controller...");

    let config = ControllerConfig::load()?;
    info!(
        "Managing {} routers and {} brokers, syncing every {:?}",
        config.routers.len(),
        config.brokers.len(),
        config.sync_interval()
    );

    let probe_timeout = config.probe_timeout();
    let client: MeshClient = InfraClient::new(
        move |host: &str, port: u16| ProbeRouterState::new(host, port, probe_timeout),
        |host: &str, port: u16| ProbeBrokerState::new(host, port),
    );

    run_until(&client, &config, tokio::signal::ctrl_c()).await
}

/// Run synchronization cycles every interval until `shutdown_signal` resolves,
/// then shut the client down.
///
/// The signal future is created once and stays alive across cycles, so a signal
/// raised while a cycle is running is seen as soon as that cycle returns.
async fn run_until<R, B, F>(
    client: &InfraClient<R, B>,
    config: &ControllerConfig,
    shutdown_signal: F,
) -> Result<()>
where
    R: RouterState,
    B: BrokerState,
    F: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(shutdown_signal);

    let mut ticker = tokio::time::interval(config.sync_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            signal = &mut shutdown_signal => {
                signal?;
                info!("Shutdown signal received, exiting...");
                break;
            }
            _ = ticker.tick() => {
                run_cycle(client, config).await;
            }
        }
    }

    client.shutdown().await?;
    Ok(())
}

/// Run one synchronization cycle. Failures are logged and retried on the next tick.
///
/// Returns the connected and total connector counts of a successful cycle.
async fn run_cycle<R, B>(client: &InfraClient<R, B>, config: &ControllerConfig) -> Option<(usize, usize)>
where
    R: RouterState,
    B: BrokerState,
{
    match client.sync_connectors(&config.routers, &config.brokers).await {
        Ok(statuses) => {
            let (connected, total) = connected_count(&statuses);
            info!("{} of {} connectors connected", connected, total);

            for status in statuses.iter().filter(|s| !s.is_connected()) {
                warn!(
                    "Connector {} -> {}:{} not connected: {}",
                    status.router_host,
                    status.host,
                    status.port,
                    status.message.as_deref().unwrap_or("no detail")
                );
            }

            match serde_json::to_string(&statuses) {
                Ok(json) => debug!("Connector statuses: {}", json),
                Err(e) => warn!("Failed to encode connector statuses: {}", e),
            }
            Some((connected, total))
        }
        Err(e) => {
            error!(
                "Synchronization failed, retrying in {:?}: {}",
                config.sync_interval(),
                e
            );
            None
        }
    }
}

fn connected_count(statuses: &[ConnectorStatus]) -> (usize, usize) {
    let connected = statuses.iter().filter(|s| s.is_connected()).count();
    (connected, statuses.len())
}
