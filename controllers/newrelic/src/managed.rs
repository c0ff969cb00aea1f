//! Generic managed-resource reconciler.
//!
//! Drives the Observe/Create/Update/Delete cycle of any [`ManagedResource`]
//! under a kube-runtime finalizer. Identifier write-backs made by the adapter
//! are persisted with a replace, and conditions plus `atProvider` with a
//! status merge patch. Both writes are skipped when nothing changed.

use crate::config::ControllerConfig;
use crate::connector::{Connection, connect};
use crate::error::ControllerError;
use crate::metrics::Metrics;
use crate::reconciler::ManagedResource;
use crds::{Condition, DeletionPolicy, Managed};
use kube::api::{Patch, PatchParams, PostParams};
use kube::{Api, Client, ResourceExt};
use kube_runtime::controller::Action;
use kube_runtime::finalizer::{Error as FinalizerError, Event as FinalizerEvent, finalizer};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Finalizer guarding external deletion
pub const FINALIZER: &str = "newrelic.crossplane.io/finalizer";

/// State shared by every reconcile.
pub struct Context {
    pub kube: Client,
    pub config: ControllerConfig,
    pub metrics: Arc<Metrics>,
}

pub async fn reconcile<K: ManagedResource>(resource: Arc<K>, ctx: Arc<Context>) -> Result<Action, ControllerError> {
    let start = Instant::now();
    let api: Api<K> = Api::all(ctx.kube.clone());

    let result = finalizer(&api, FINALIZER, resource, |event| async {
        match event {
            FinalizerEvent::Apply(resource) => apply(resource, &api, &ctx).await,
            FinalizerEvent::Cleanup(resource) => cleanup(resource, &api, &ctx).await,
        }
    })
    .await
    .map_err(|e| match e {
        FinalizerError::ApplyFailed(e) | FinalizerError::CleanupFailed(e) => e,
        other => ControllerError::Finalizer(Box::new(other)),
    });

    ctx.metrics
        .record_reconcile(K::KIND, result.is_ok(), start.elapsed().as_secs_f64());
    result
}

/// Requeue failed reconciles after the configured delay.
pub fn error_policy<K: ManagedResource>(resource: Arc<K>, error: &ControllerError, ctx: Arc<Context>) -> Action {
    error!("Reconciliation error for {} {}: {}", K::KIND, resource.name_any(), error);
    Action::requeue(ctx.config.error_requeue)
}

async fn apply<K: ManagedResource>(resource: Arc<K>, api: &Api<K>, ctx: &Context) -> Result<Action, ControllerError> {
    let name = resource.name_any();
    let mut desired = (*resource).clone();

    let outcome = converge(&mut desired, ctx).await;

    // Write-backs are kept even when converging failed part way
    if without_status(serde_json::to_value(&desired)?) != without_status(serde_json::to_value(&*resource)?) {
        debug!("Persisting identifiers for {} {}", K::KIND, name);
        api.replace(&name, &PostParams::default(), &desired).await?;
    }

    let conditions = match &outcome {
        Ok(ready) => vec![ready.clone(), Condition::reconcile_success()],
        Err(e) => vec![Condition::reconcile_error(e.to_string())],
    };
    if let Some(patch) = status_patch(&desired, conditions)? {
        api.patch_status(&name, &PatchParams::default(), &Patch::Merge(&patch))
            .await?;
    }

    outcome?;
    Ok(Action::requeue(ctx.config.poll_interval))
}

/// One Observe pass plus the Create or Update it calls for. Returns the Ready condition.
async fn converge<K: ManagedResource>(resource: &mut K, ctx: &Context) -> Result<Condition, ControllerError> {
    let name = resource.name_any();

    if resource.resolve_references(&ctx.kube).await? {
        debug!("Resolved references for {} {}", K::KIND, name);
    }

    let connection = connect(&ctx.kube, &*resource).await?;
    let external = K::external(connection);

    let observation = external.observe(resource).await?;
    if !observation.resource_exists {
        info!("{} {} does not exist in New Relic, creating", K::KIND, name);
        ctx.metrics.record_external_call(K::KIND, "create");
        external.create(resource).await?;
        // Ready turns Available on the next reconcile, once observe sees the resource
        return Ok(Condition::creating());
    }

    if !observation.resource_up_to_date {
        info!("{} {} is out of date, updating", K::KIND, name);
        ctx.metrics.record_external_call(K::KIND, "update");
        external.update(resource).await?;
    } else {
        debug!("{} {} is up to date", K::KIND, name);
    }
    Ok(Condition::available())
}

async fn cleanup<K: ManagedResource>(resource: Arc<K>, api: &Api<K>, ctx: &Context) -> Result<Action, ControllerError> {
    let name = resource.name_any();

    if !is_orphaned(&*resource) {
        if let Some(patch) = status_patch(&*resource, [Condition::deleting()])? {
            if let Err(e) = api
                .patch_status(&name, &PatchParams::default(), &Patch::Merge(&patch))
                .await
            {
                warn!("Failed to mark {} {} as deleting: {}", K::KIND, name, e);
            }
        }
    }

    let mut target = (*resource).clone();
    if delete_external(&mut target, connect(&ctx.kube, &*resource)).await? {
        ctx.metrics.record_external_call(K::KIND, "delete");
        info!("{} {} removed from New Relic", K::KIND, name);
    } else {
        info!("{} {} has deletionPolicy Orphan, keeping the New Relic resource", K::KIND, name);
    }
    Ok(Action::await_change())
}

fn is_orphaned<K: Managed>(resource: &K) -> bool {
    resource.resource_spec().deletion_policy == DeletionPolicy::Orphan
}

/// Delete the external resource unless it is orphaned. `connection` is only
/// awaited when a delete is issued. Returns whether one was.
pub(crate) async fn delete_external<K, C>(resource: &mut K, connection: C) -> Result<bool, ControllerError>
where
    K: ManagedResource,
    C: Future<Output = Result<Connection, ControllerError>>,
{
    if is_orphaned(resource) {
        return Ok(false);
    }
    K::external(connection.await?).delete(resource).await?;
    Ok(true)
}

/// Merge patch for `status`, or `None` when conditions and `atProvider` are unchanged.
pub(crate) fn status_patch<K: Managed + Serialize>(
    resource: &K,
    conditions: impl IntoIterator<Item = Condition>,
) -> Result<Option<Value>, ControllerError> {
    let mut status = resource.resource_status().cloned().unwrap_or_default();
    let previous = status.conditions.clone();
    status.set_conditions(conditions);

    let at_provider = without_empty_strings(resource.at_provider());
    let current = serde_json::to_value(resource)?
        .pointer("/status/atProvider")
        .cloned()
        .unwrap_or_else(|| json!({}));

    if status.conditions == previous && current == at_provider {
        return Ok(None);
    }
    Ok(Some(json!({
        "status": {
            "conditions": status.conditions,
            "atProvider": at_provider,
        }
    })))
}

/// Status travels through the status subresource, never through `replace`.
fn without_status(mut value: Value) -> Value {
    if let Some(map) = value.as_object_mut() {
        map.remove("status");
    }
    value
}

fn without_empty_strings(value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            map.retain(|_, v| v.as_str() != Some(""));
            Value::Object(map)
        }
        other => other,
    }
}
