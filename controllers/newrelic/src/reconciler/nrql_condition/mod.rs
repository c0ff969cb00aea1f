//! NrqlAlertCondition adapter.
//!
//! The condition's policy comes from `policyId` or a resolved AlertsPolicy
//! reference. A create rejected because the policy no longer exists clears
//! `policyId` so the next reconcile resolves it again.

pub mod compare;
pub mod translate;

use super::{ManagedResource, known_id};
use crate::connector::Connection;
use crate::error::ControllerError;
use crate::external::{ExternalClient, ExternalObservation};
use crate::references;
use async_trait::async_trait;
use crds::NrqlAlertCondition;
use kube::{Client, ResourceExt};
use newrelic_client::{NewRelicClientTrait, NrqlConditionUpdateInput, NrqlConditionsSearchCriteria};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[async_trait]
impl ManagedResource for NrqlAlertCondition {
    const KIND: &'static str = "NrqlAlertCondition";

    async fn resolve_references(&mut self, kube: &Client) -> Result<bool, ControllerError> {
        references::resolve_policy_id(kube, self).await
    }

    fn external(connection: Connection) -> Box<dyn ExternalClient<Self>> {
        Box::new(NrqlConditionExternal::new(connection))
    }
}

/// Observe/Create/Update/Delete for NRQL alert conditions.
pub struct NrqlConditionExternal {
    client: Arc<dyn NewRelicClientTrait>,
    account_id: i64,
}

impl NrqlConditionExternal {
    pub fn new(connection: Connection) -> Self {
        Self {
            client: connection.client,
            account_id: connection.account_id,
        }
    }

    /// Fetch by ID, falling back to the first condition with the same name in the policy.
    async fn find(&self, cr: &NrqlAlertCondition) -> Result<Option<newrelic_client::NrqlAlertCondition>, ControllerError> {
        let id = known_id(cr);
        if !id.is_empty() {
            match self.client.get_nrql_condition(self.account_id, &id).await {
                Ok(condition) => return Ok(Some(condition)),
                Err(e) if e.is_not_found() => {
                    warn!("NrqlAlertCondition {} ID {} not found, searching by name", cr.name_any(), id);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let criteria = NrqlConditionsSearchCriteria {
            name: cr.spec.for_provider.name.clone(),
            policy_id: cr.spec.for_provider.policy_id.clone(),
        };
        let mut conditions = self.client.search_nrql_conditions(self.account_id, &criteria).await?;
        if conditions.is_empty() {
            return Ok(None);
        }
        let condition = conditions.swap_remove(0);
        info!("Updating {} with new ID: {}", criteria.name, condition.id);
        Ok(Some(condition))
    }
}

/// Record the condition ID in the spec and the external-name annotation.
pub fn write_back_id(cr: &mut NrqlAlertCondition, id: &str) -> bool {
    let mut changed = false;
    if cr.spec.for_provider.id != id {
        cr.spec.for_provider.id = id.to_string();
        changed = true;
    }
    crds::set_external_name(cr, id) || changed
}

/// True for the error New Relic returns when creating into a deleted policy.
pub fn is_missing_policy_error(message: &str) -> bool {
    let Some(start) = message.find("Policy with ID ") else {
        return false;
    };
    let rest = &message[start + "Policy with ID ".len()..];
    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    rest[digits..].starts_with(" not found")
}

#[async_trait]
impl ExternalClient<NrqlAlertCondition> for NrqlConditionExternal {
    async fn observe(&self, cr: &mut NrqlAlertCondition) -> Result<ExternalObservation, ControllerError> {
        let Some(condition) = self.find(cr).await? else {
            return Ok(ExternalObservation::absent());
        };
        if condition.id.is_empty() {
            return Ok(ExternalObservation::absent());
        }

        write_back_id(cr, &condition.id);
        let desired = translate::condition_input(&cr.spec.for_provider);
        Ok(ExternalObservation::present(compare::is_up_to_date(&desired, &condition)))
    }

    async fn create(&self, cr: &mut NrqlAlertCondition) -> Result<(), ControllerError> {
        let policy_id = cr.spec.for_provider.policy_id.clone();
        if policy_id.is_empty() {
            return Err(ControllerError::Reference(format!(
                "NrqlAlertCondition {} has no policyId yet",
                cr.name_any()
            )));
        }

        let input = translate::condition_input(&cr.spec.for_provider);
        match self.client.create_nrql_condition(self.account_id, &policy_id, &input).await {
            Ok(condition) => {
                info!("Created NRQL condition {} with ID {}", condition.name, condition.id);
                write_back_id(cr, &condition.id);
                Ok(())
            }
            Err(e) => {
                if is_missing_policy_error(&e.to_string()) {
                    warn!("Policy {} no longer exists, clearing policyId for {}", policy_id, cr.name_any());
                    cr.spec.for_provider.policy_id.clear();
                }
                Err(e.into())
            }
        }
    }

    async fn update(&self, cr: &mut NrqlAlertCondition) -> Result<(), ControllerError> {
        let id = known_id(cr);
        let input = translate::condition_input(&cr.spec.for_provider);
        let update = NrqlConditionUpdateInput::try_from(&input)?;
        let condition = self.client.update_nrql_condition(self.account_id, &id, &update).await?;
        info!("Updated NRQL condition {} ({})", condition.name, condition.id);
        Ok(())
    }

    async fn delete(&self, cr: &mut NrqlAlertCondition) -> Result<(), ControllerError> {
        let id = known_id(cr);
        if id.is_empty() {
            info!("Skipping delete for nrql condition {}: ID must be set", cr.spec.for_provider.name);
            return Ok(());
        }

        match self.client.delete_nrql_condition(self.account_id, &id).await {
            Ok(()) => {
                info!("Deleted NRQL condition {}", id);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!("NRQL condition {} already gone", id);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
