//! New Relic Provider
//!
//! Reconciles New Relic alert policies, NRQL alert conditions and dashboards
//! from Kubernetes custom resources. Each resource names a ProviderConfig
//! holding the account ID, region and API key Secret.

mod config;
mod connector;
mod controller;
mod error;
mod external;
mod managed;
mod metrics;
mod reconciler;
mod references;
#[cfg(test)]
mod test_utils;
mod watcher;

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::metrics::Metrics;
use controller::Controller;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if rustls::crypto::ring::default_provider().install_default().is_err() {
        error!("A rustls crypto provider was already installed");
    }

    info!("Starting New Relic Provider");

    let config = ControllerConfig::from_env()?;

    info!("Configuration:");
    info!("  Namespace: {}", config.namespace.as_deref().unwrap_or("all namespaces"));
    info!("  Poll interval: {:?}", config.poll_interval);
    info!("  Error requeue: {:?}", config.error_requeue);
    info!("  Concurrency per kind: {}", config.concurrency);
    info!("  Metrics address: {}", config.metrics_addr);

    let metrics = Arc::new(Metrics::new()?);
    let metrics_addr = config.metrics_addr;

    let controller = Controller::new(config, Arc::clone(&metrics)).await?;

    tokio::select! {
        result = controller.run() => result?,
        result = metrics::serve(metrics_addr, metrics) => result?,
    }

    Ok(())
}
