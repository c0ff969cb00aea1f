//! Kubernetes resource watchers.
//!
//! Every managed kind is watched through the same `watch_resource()` helper.
//! kube-runtime's `Controller` owns reconnection, retries and requeues; the
//! per-kind behaviour lives behind [`ManagedResource`].

use crate::error::ControllerError;
use crate::managed::{self, Context};
use crate::reconciler::ManagedResource;
use futures::StreamExt;
use kube::Api;
use kube_runtime::{Controller, watcher, controller::Config as RuntimeConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Quiet period after the last event before a reconcile starts
const DEBOUNCE: Duration = Duration::from_secs(5);

/// Watch `api` and reconcile every object until the stream ends.
pub async fn watch_resource<K: ManagedResource>(api: Api<K>, ctx: Arc<Context>) -> Result<(), ControllerError> {
    info!("Starting {} watcher", K::KIND);

    // Status patches do not bump metadata.generation, but the finalizer and
    // identifier write-backs do; debounce folds them into one reconcile.
    let controller_config = RuntimeConfig::default()
        .debounce(DEBOUNCE)
        .concurrency(ctx.config.concurrency);

    Controller::new(api, watcher::Config::default())
        .with_config(controller_config)
        .shutdown_on_signal()
        .run(managed::reconcile::<K>, managed::error_policy::<K>, ctx)
        .for_each(|res| async move {
            match res {
                Ok((obj, _)) => debug!("Reconciled {} {}", K::KIND, obj.name),
                Err(e) => error!("Controller error for {}: {}", K::KIND, e),
            }
        })
        .await;

    info!("{} watcher stopped", K::KIND);
    Ok(())
}
