//! AlertsPolicy adapter.
//!
//! Policies are read and written through NerdGraph. Name lookup and channel
//! association still go through REST v2.

use super::{ManagedResource, known_id};
use crate::connector::Connection;
use crate::error::ControllerError;
use crate::external::{ExternalClient, ExternalObservation};
use async_trait::async_trait;
use crds::AlertsPolicy;
use kube::ResourceExt;
use newrelic_client::{AlertsPolicyInput, NewRelicClientTrait, NewRelicError};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[async_trait]
impl ManagedResource for AlertsPolicy {
    const KIND: &'static str = "AlertsPolicy";

    fn external(connection: Connection) -> Box<dyn ExternalClient<Self>> {
        Box::new(AlertsPolicyExternal::new(connection))
    }
}

/// Observe/Create/Update/Delete for alerts policies.
pub struct AlertsPolicyExternal {
    client: Arc<dyn NewRelicClientTrait>,
    account_id: i64,
}

impl AlertsPolicyExternal {
    pub fn new(connection: Connection) -> Self {
        Self {
            client: connection.client,
            account_id: connection.account_id,
        }
    }

    /// Fetch by ID, falling back to the first policy with the same name.
    async fn find(&self, cr: &AlertsPolicy) -> Result<Option<newrelic_client::AlertsPolicy>, ControllerError> {
        let id = known_id(cr);
        if !id.is_empty() {
            match self.client.get_policy(self.account_id, &id).await {
                Ok(policy) => return Ok(Some(policy)),
                Err(e) if e.is_not_found() => {
                    warn!("AlertsPolicy {} ID {} not found, looking up by name", cr.name_any(), id);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let name = &cr.spec.for_provider.name;
        let candidates = self.client.list_policies_by_name(name).await?;
        let Some(candidate) = candidates.first() else {
            return Ok(None);
        };

        match self.client.get_policy(self.account_id, &candidate.id.to_string()).await {
            Ok(policy) => {
                info!("Updating policy {} with new ID: {}", policy.name, policy.id);
                Ok(Some(policy))
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the policy's channels with `channelIds` and record them in `atProvider`.
    /// An empty list detaches every channel.
    async fn replace_channels(&self, cr: &mut AlertsPolicy, policy_id: &str) -> Result<(), ControllerError> {
        let numeric_id = policy_id.parse::<i64>().map_err(|e| {
            NewRelicError::InvalidRequest(format!("policy ID '{}' is not numeric: {}", policy_id, e))
        })?;
        let channels = self
            .client
            .update_policy_channels(numeric_id, &cr.spec.for_provider.channel_ids)
            .await?;
        debug!("Policy {} channels: {:?}", channels.id, channels.channel_ids);

        record_channels(cr);
        Ok(())
    }
}

fn sorted_channels(cr: &AlertsPolicy) -> Vec<i64> {
    let mut channels = cr.spec.for_provider.channel_ids.clone();
    channels.sort_unstable();
    channels.dedup();
    channels
}

fn record_channels(cr: &mut AlertsPolicy) {
    let channels = sorted_channels(cr);
    cr.status.get_or_insert_with(Default::default).at_provider.channel_ids = Some(channels);
}

/// Build the NerdGraph input for a policy.
pub fn policy_input(cr: &AlertsPolicy) -> AlertsPolicyInput {
    AlertsPolicyInput {
        incident_preference: cr.spec.for_provider.incident_preference.as_str().to_string(),
        name: cr.spec.for_provider.name.clone(),
    }
}

/// Name, incident preference and the channels last attached decide whether a
/// policy needs an update. Channels are only compared once the controller has
/// recorded them; New Relic does not report them on the policy.
pub fn is_up_to_date(cr: &AlertsPolicy, observed: &newrelic_client::AlertsPolicy) -> bool {
    let desired = policy_input(cr);
    if desired.name != observed.name || desired.incident_preference != observed.incident_preference {
        return false;
    }
    match cr.status.as_ref().and_then(|s| s.at_provider.channel_ids.as_ref()) {
        Some(attached) => *attached == sorted_channels(cr),
        None => true,
    }
}

/// Record the policy ID in the spec and the external-name annotation.
pub fn write_back_id(cr: &mut AlertsPolicy, id: &str) -> bool {
    let mut changed = false;
    if cr.spec.for_provider.id != id {
        cr.spec.for_provider.id = id.to_string();
        changed = true;
    }
    crds::set_external_name(cr, id) || changed
}

#[async_trait]
impl ExternalClient<AlertsPolicy> for AlertsPolicyExternal {
    async fn observe(&self, cr: &mut AlertsPolicy) -> Result<ExternalObservation, ControllerError> {
        let Some(policy) = self.find(cr).await? else {
            return Ok(ExternalObservation::absent());
        };
        if policy.id.is_empty() {
            return Ok(ExternalObservation::absent());
        }

        write_back_id(cr, &policy.id);
        Ok(ExternalObservation::present(is_up_to_date(cr, &policy)))
    }

    async fn create(&self, cr: &mut AlertsPolicy) -> Result<(), ControllerError> {
        let input = policy_input(cr);
        let policy = self.client.create_policy(self.account_id, &input).await?;
        info!("Created alerts policy {} with ID {}", policy.name, policy.id);

        write_back_id(cr, &policy.id);
        // A new policy has no channels to detach
        if cr.spec.for_provider.channel_ids.is_empty() {
            record_channels(cr);
            return Ok(());
        }
        self.replace_channels(cr, &policy.id).await
    }

    async fn update(&self, cr: &mut AlertsPolicy) -> Result<(), ControllerError> {
        let id = known_id(cr);
        let input = policy_input(cr);
        let policy = self.client.update_policy(self.account_id, &id, &input).await?;
        info!("Updated alerts policy {} ({})", policy.name, policy.id);

        self.replace_channels(cr, &id).await
    }

    async fn delete(&self, cr: &mut AlertsPolicy) -> Result<(), ControllerError> {
        let id = known_id(cr);
        if id.is_empty() {
            info!("Skipping delete for policy {}: ID must be set", cr.spec.for_provider.name);
            return Ok(());
        }

        match self.client.delete_policy(self.account_id, &id).await {
            Ok(()) => {
                info!("Deleted alerts policy {}", id);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!("Alerts policy {} already gone", id);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
