//! AlertsPolicy Custom Resource Definition
//!
//! Manages a New Relic alerts policy and the notification channels
//! attached to it.

use crate::common::{Managed, ResourceSpec, ResourceStatus};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// AlertsPolicySpec defines the desired state of an alerts policy
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
    group = "newrelic.crossplane.io",
    version = "v1alpha1",
    kind = "AlertsPolicy",
    plural = "alertspolicies",
    status = "AlertsPolicyStatus",
    category = "newrelic",
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.atProvider.id"}"#,
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"SYNCED","type":"string","jsonPath":".status.conditions[?(@.type=='Synced')].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct AlertsPolicySpec {
    #[serde(flatten)]
    pub resource: ResourceSpec,

    pub for_provider: AlertsPolicyParameters,
}

/// Configurable fields of a policy
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertsPolicyParameters {
    /// Policy ID assigned by New Relic (written back by the controller)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    pub incident_preference: IncidentPreference,

    pub name: String,

    /// Notification channel IDs attached to the policy
    #[serde(default)]
    pub channel_ids: Vec<i64>,
}

/// How incidents are grouped for the policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentPreference {
    #[default]
    PerPolicy,
    PerCondition,
    PerConditionAndTarget,
}

impl IncidentPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentPreference::PerPolicy => "PER_POLICY",
            IncidentPreference::PerCondition => "PER_CONDITION",
            IncidentPreference::PerConditionAndTarget => "PER_CONDITION_AND_TARGET",
        }
    }
}

/// AlertsPolicyStatus defines the observed state of an alerts policy
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertsPolicyStatus {
    #[serde(flatten)]
    pub resource: ResourceStatus,

    #[serde(default)]
    pub at_provider: AlertsPolicyObservation,
}

/// Observable fields of a policy
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertsPolicyObservation {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Channel IDs last attached by the controller, sorted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_ids: Option<Vec<i64>>,
}

impl Managed for AlertsPolicy {
    fn resource_spec(&self) -> &ResourceSpec {
        &self.spec.resource
    }

    fn resource_status(&self) -> Option<&ResourceStatus> {
        self.status.as_ref().map(|s| &s.resource)
    }

    fn external_id(&self) -> &str {
        &self.spec.for_provider.id
    }

    fn at_provider(&self) -> serde_json::Value {
        let mut at_provider = serde_json::json!({ "id": self.spec.for_provider.id });
        if let Some(channels) = self.status.as_ref().and_then(|s| s.at_provider.channel_ids.as_ref()) {
            at_provider["channelIds"] = serde_json::json!(channels);
        }
        at_provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_provider_reports_attached_channels() {
        let mut policy = AlertsPolicy::new("checkout", AlertsPolicySpec::default());
        policy.spec.for_provider.id = "5".to_string();
        assert_eq!(policy.at_provider(), serde_json::json!({ "id": "5" }));

        policy.status = Some(AlertsPolicyStatus {
            at_provider: AlertsPolicyObservation {
                id: "5".to_string(),
                channel_ids: Some(vec![]),
            },
            ..Default::default()
        });
        assert_eq!(policy.at_provider(), serde_json::json!({ "id": "5", "channelIds": [] }));
    }

    #[test]
    fn parses_policy_manifest() {
        let spec: AlertsPolicySpec = serde_json::from_value(serde_json::json!({
            "providerConfigRef": { "name": "nr" },
            "forProvider": {
                "name": "test_name",
                "incidentPreference": "PER_CONDITION_AND_TARGET",
                "channelIds": [1, 2]
            }
        }))
        .expect("valid manifest");

        assert_eq!(spec.resource.provider_config_ref.name, "nr");
        assert_eq!(
            spec.for_provider.incident_preference,
            IncidentPreference::PerConditionAndTarget
        );
        assert_eq!(spec.for_provider.incident_preference.as_str(), "PER_CONDITION_AND_TARGET");
        assert!(spec.for_provider.id.is_empty());
        assert_eq!(spec.for_provider.channel_ids, vec![1, 2]);
    }
}
