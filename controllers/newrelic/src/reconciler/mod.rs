//! Per-kind lifecycle adapters.
//!
//! Each managed kind plugs into the generic reconciler through
//! [`ManagedResource`]: a kind name for logs and metrics, an optional
//! reference-resolution step, and the adapter that talks to New Relic.

pub mod alerts_policy;
#[cfg(test)]
mod alerts_policy_test;
pub mod dashboard;
pub mod nrql_condition;

use crate::connector::Connection;
use crate::error::ControllerError;
use crate::external::ExternalClient;
use async_trait::async_trait;
use crds::Managed;
use kube::{Client, Resource, ResourceExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

pub use alerts_policy::AlertsPolicyExternal;
pub use dashboard::DashboardExternal;
pub use nrql_condition::NrqlConditionExternal;

/// A custom resource the provider reconciles against New Relic.
#[async_trait]
pub trait ManagedResource:
    Managed + Resource<DynamicType = ()> + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Kind name used in logs and metric labels.
    const KIND: &'static str;

    /// Fill fields derived from other resources. Returns whether anything changed.
    async fn resolve_references(&mut self, _kube: &Client) -> Result<bool, ControllerError> {
        Ok(false)
    }

    /// Adapter bound to `connection`.
    fn external(connection: Connection) -> Box<dyn ExternalClient<Self>>;
}

/// The identifier New Relic assigned, from the spec or the external-name annotation.
pub(crate) fn known_id<K: Managed + ResourceExt>(resource: &K) -> String {
    let id = resource.external_id();
    if !id.is_empty() {
        return id.to_string();
    }
    crds::external_name(resource).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn known_id_prefers_spec_then_annotation() {
        let mut policy = create_test_alerts_policy("checkout", "");
        assert_eq!(known_id(&policy), "");

        crds::set_external_name(&mut policy, "42");
        assert_eq!(known_id(&policy), "42");

        policy.spec.for_provider.id = "43".to_string();
        assert_eq!(known_id(&policy), "43");
    }
}
