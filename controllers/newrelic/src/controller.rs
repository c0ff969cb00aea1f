//! Main controller implementation.
//!
//! The `Controller` owns one watcher task per managed kind:
//! - AlertsPolicy: alert policies and their notification channels
//! - NrqlAlertCondition: NRQL conditions attached to a policy
//! - Dashboard: dashboards with their pages, widgets and variables

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::managed::Context;
use crate::metrics::Metrics;
use crate::watcher::watch_resource;
use crds::{AlertsPolicy, Dashboard, NrqlAlertCondition};
use kube::{Api, Client};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Runs the watchers for every New Relic kind.
pub struct Controller {
    alerts_policy_watcher: JoinHandle<Result<(), ControllerError>>,
    nrql_condition_watcher: JoinHandle<Result<(), ControllerError>>,
    dashboard_watcher: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Connect to the cluster and start the watchers.
    pub async fn new(config: ControllerConfig, metrics: Arc<Metrics>) -> Result<Self, ControllerError> {
        info!("Initializing New Relic provider");

        let kube_client = Client::try_default().await?;

        // Managed kinds and ProviderConfig are cluster scoped
        let alerts_policy_api: Api<AlertsPolicy> = Api::all(kube_client.clone());
        let nrql_condition_api: Api<NrqlAlertCondition> = Api::all(kube_client.clone());
        let dashboard_api: Api<Dashboard> = Api::all(kube_client.clone());

        let ctx = Arc::new(Context {
            kube: kube_client,
            config,
            metrics,
        });

        let alerts_policy_watcher = {
            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move { watch_resource(alerts_policy_api, ctx).await })
        };

        let nrql_condition_watcher = {
            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move { watch_resource(nrql_condition_api, ctx).await })
        };

        let dashboard_watcher = tokio::spawn(async move { watch_resource(dashboard_api, ctx).await });

        Ok(Self {
            alerts_policy_watcher,
            nrql_condition_watcher,
            dashboard_watcher,
        })
    }

    /// Run until any watcher exits.
    pub async fn run(mut self) -> Result<(), ControllerError> {
        info!("New Relic provider running");

        tokio::select! {
            result = &mut self.alerts_policy_watcher => {
                result.map_err(|e| ControllerError::Watch(format!("AlertsPolicy watcher panicked: {}", e)))??;
            }
            result = &mut self.nrql_condition_watcher => {
                result.map_err(|e| ControllerError::Watch(format!("NrqlAlertCondition watcher panicked: {}", e)))??;
            }
            result = &mut self.dashboard_watcher => {
                result.map_err(|e| ControllerError::Watch(format!("Dashboard watcher panicked: {}", e)))??;
            }
        }

        info!("New Relic provider stopped");
        Ok(())
    }
}
