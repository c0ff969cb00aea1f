//! Dashboard adapter.
//!
//! The spec is translated to a `DashboardInput`, the entity New Relic
//! reports is normalized to the same shape, and the two are compared. Page
//! GUIDs and widget IDs are copied back after every create and update so the
//! next update edits widgets in place instead of duplicating them.

pub mod compare;
#[cfg(test)]
mod dashboard_test;
pub mod guids;
pub mod normalize;
pub mod translate;

use super::{ManagedResource, known_id};
use crate::connector::Connection;
use crate::error::ControllerError;
use crate::external::{ExternalClient, ExternalObservation};
use async_trait::async_trait;
use crds::Dashboard;
use kube::ResourceExt;
use newrelic_client::{DashboardEntity, DashboardMutationResult, NewRelicClientTrait, NewRelicError};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[async_trait]
impl ManagedResource for Dashboard {
    const KIND: &'static str = "Dashboard";

    fn external(connection: Connection) -> Box<dyn ExternalClient<Self>> {
        Box::new(DashboardExternal::new(connection))
    }
}

/// Observe/Create/Update/Delete for dashboards.
pub struct DashboardExternal {
    client: Arc<dyn NewRelicClientTrait>,
    account_id: i64,
}

impl DashboardExternal {
    pub fn new(connection: Connection) -> Self {
        Self {
            client: connection.client,
            account_id: connection.account_id,
        }
    }

    fn account_for(&self, cr: &Dashboard) -> i64 {
        cr.spec.for_provider.account_id.unwrap_or(self.account_id)
    }

    /// Fetch by GUID, falling back to an exact name match within the account.
    async fn find(&self, cr: &Dashboard, guid: &str) -> Result<Option<DashboardEntity>, ControllerError> {
        match self.client.get_dashboard_entity(guid).await {
            Ok(entity) => return Ok(Some(entity)),
            Err(e) if e.is_not_found() => {
                warn!("Dashboard {} GUID {} not found, searching by name", cr.name_any(), guid);
            }
            Err(e) => return Err(e.into()),
        }

        let name = &cr.spec.for_provider.name;
        let account_id = self.account_for(cr);
        let results = self.client.search_dashboards_by_name(name).await?;
        let Some(found) = results
            .into_iter()
            .find(|r| &r.name == name && r.account_id == Some(account_id))
        else {
            return Ok(None);
        };

        match self.client.get_dashboard_entity(&found.guid).await {
            Ok(entity) => {
                info!("Updating dashboard {} with new GUID: {}", name, entity.guid);
                Ok(Some(entity))
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// The entity from a create/update result, or the first reported error.
fn mutation_entity(result: DashboardMutationResult) -> Result<DashboardEntity, NewRelicError> {
    if let Some(error) = result.errors.into_iter().next() {
        return Err(NewRelicError::Api(error.description));
    }
    result
        .entity_result
        .ok_or_else(|| NewRelicError::Api("dashboard mutation returned no entity".to_string()))
}

/// Copy the GUID tree into the spec and the external-name annotation.
fn record_identifiers(cr: &mut Dashboard, entity: &DashboardEntity) -> bool {
    let changed = guids::write_back(&mut cr.spec.for_provider, entity);
    crds::set_external_name(cr, &entity.guid) || changed
}

/// Desired and observed in canonical form, compared.
pub fn is_up_to_date(cr: &Dashboard, entity: &DashboardEntity) -> Result<bool, ControllerError> {
    let desired = translate::dashboard_input(&cr.spec.for_provider)?;
    let observed = normalize::entity_input(entity);
    Ok(compare::is_up_to_date(&desired, &observed))
}

#[async_trait]
impl ExternalClient<Dashboard> for DashboardExternal {
    async fn observe(&self, cr: &mut Dashboard) -> Result<ExternalObservation, ControllerError> {
        let guid = known_id(cr);
        if guid.is_empty() {
            return Ok(ExternalObservation::absent());
        }

        let Some(entity) = self.find(cr, &guid).await? else {
            return Ok(ExternalObservation::absent());
        };
        if entity.guid.is_empty() {
            return Ok(ExternalObservation::absent());
        }

        if cr.spec.for_provider.guid != entity.guid {
            cr.spec.for_provider.guid = entity.guid.clone();
        }
        crds::set_external_name(cr, &entity.guid);

        Ok(ExternalObservation::present(is_up_to_date(cr, &entity)?))
    }

    async fn create(&self, cr: &mut Dashboard) -> Result<(), ControllerError> {
        let input = translate::dashboard_input(&cr.spec.for_provider)?;
        let result = self.client.create_dashboard(self.account_for(cr), &input).await?;
        let entity = mutation_entity(result)?;
        info!("Created dashboard {} with GUID {}", entity.name, entity.guid);

        record_identifiers(cr, &entity);
        Ok(())
    }

    async fn update(&self, cr: &mut Dashboard) -> Result<(), ControllerError> {
        let guid = known_id(cr);
        let input = translate::dashboard_input(&cr.spec.for_provider)?;
        let result = self.client.update_dashboard(&guid, &input).await?;
        let entity = mutation_entity(result)?;
        info!("Updated dashboard {} ({})", entity.name, entity.guid);

        if record_identifiers(cr, &entity) {
            debug!("Dashboard {} identifiers changed", cr.name_any());
        }
        Ok(())
    }

    async fn delete(&self, cr: &mut Dashboard) -> Result<(), ControllerError> {
        let guid = known_id(cr);
        if guid.is_empty() {
            info!("Skipping delete for dashboard {}: guid must be set", cr.spec.for_provider.name);
            return Ok(());
        }

        match self.client.delete_dashboard(&guid).await {
            Ok(()) => {
                info!("Deleted dashboard {}", guid);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!("Dashboard {} already gone", guid);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
