//! NrqlAlertCondition Custom Resource Definition
//!
//! Manages a NRQL alert condition inside an alerts policy. The policy is
//! given directly (`policyId`) or resolved from an `AlertsPolicy` resource
//! through `alertsPolicyRef` / `alertsPolicySelector`.

use crate::common::{Managed, ResourceSpec, ResourceStatus};
use crate::references::{Reference, Selector};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// NrqlAlertConditionSpec defines the desired state of a NRQL condition
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
    group = "newrelic.crossplane.io",
    version = "v1alpha1",
    kind = "NrqlAlertCondition",
    status = "NrqlAlertConditionStatus",
    category = "newrelic",
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.atProvider.id"}"#,
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"SYNCED","type":"string","jsonPath":".status.conditions[?(@.type=='Synced')].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct NrqlAlertConditionSpec {
    #[serde(flatten)]
    pub resource: ResourceSpec,

    pub for_provider: NrqlAlertConditionParameters,
}

/// Configurable fields of a NRQL condition
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NrqlAlertConditionParameters {
    /// Condition ID assigned by New Relic (written back by the controller)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(rename = "type", default)]
    pub condition_type: NrqlConditionType,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub runbook_url: Option<String>,

    pub enabled: bool,

    /// Seconds before an open violation is force-closed (300 to 2592000)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation_time_limit_seconds: Option<i64>,

    /// At most one CRITICAL and one WARNING term
    #[serde(default)]
    pub terms: Vec<NrqlConditionTerm>,

    pub nrql: Nrql,

    #[serde(default)]
    pub signal: Signal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<Expiration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_function: Option<ValueFunction>,

    /// Only meaningful for BASELINE conditions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_direction: Option<BaselineDirection>,

    /// ID of the policy the condition belongs to
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub policy_id: String,

    /// AlertsPolicy resource supplying `policyId`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alerts_policy_ref: Option<Reference>,

    /// Labels selecting the AlertsPolicy resource supplying `policyId`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alerts_policy_selector: Option<Selector>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NrqlConditionType {
    #[default]
    Static,
    Baseline,
    Outlier,
}

impl NrqlConditionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NrqlConditionType::Static => "STATIC",
            NrqlConditionType::Baseline => "BASELINE",
            NrqlConditionType::Outlier => "OUTLIER",
        }
    }
}

/// A threshold term
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NrqlConditionTerm {
    /// ABOVE, BELOW or EQUALS
    #[serde(default)]
    pub operator: String,

    /// CRITICAL or WARNING
    #[serde(default)]
    pub priority: String,

    /// Numeric threshold, kept as a string
    pub threshold: String,

    /// Seconds, multiple of 60 between 60 and 7200
    #[serde(default)]
    pub threshold_duration: i64,

    /// ALL or AT_LEAST_ONCE
    #[serde(default)]
    pub threshold_occurrences: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Nrql {
    pub query: String,
}

/// How the query results are aggregated into a signal
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation_window: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_delay: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_offset: Option<i64>,

    /// LAST_VALUE, NONE or STATIC
    #[serde(default)]
    pub fill_option: String,

    /// Only used with STATIC fill
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation_method: Option<AggregationMethod>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation_delay: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation_timer: Option<i64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationMethod {
    Cadence,
    EventFlow,
    EventTimer,
}

impl AggregationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationMethod::Cadence => "CADENCE",
            AggregationMethod::EventFlow => "EVENT_FLOW",
            AggregationMethod::EventTimer => "EVENT_TIMER",
        }
    }
}

/// Loss-of-signal settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expiration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_duration: Option<i64>,

    #[serde(default)]
    pub open_violation_on_expiration: bool,

    #[serde(default)]
    pub close_violations_on_expiration: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueFunction {
    SingleValue,
    Sum,
}

impl ValueFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueFunction::SingleValue => "SINGLE_VALUE",
            ValueFunction::Sum => "SUM",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaselineDirection {
    LowerOnly,
    UpperAndLower,
    UpperOnly,
}

impl BaselineDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaselineDirection::LowerOnly => "LOWER_ONLY",
            BaselineDirection::UpperAndLower => "UPPER_AND_LOWER",
            BaselineDirection::UpperOnly => "UPPER_ONLY",
        }
    }
}

/// NrqlAlertConditionStatus defines the observed state of a NRQL condition
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NrqlAlertConditionStatus {
    #[serde(flatten)]
    pub resource: ResourceStatus,

    #[serde(default)]
    pub at_provider: NrqlAlertConditionObservation,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NrqlAlertConditionObservation {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
}

impl Managed for NrqlAlertCondition {
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
        serde_json::json!({ "id": self.spec.for_provider.id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_condition_manifest_with_reference() {
        let spec: NrqlAlertConditionSpec = serde_json::from_value(serde_json::json!({
            "forProvider": {
                "name": "test_nrql",
                "enabled": true,
                "terms": [{
                    "operator": "ABOVE",
                    "priority": "CRITICAL",
                    "threshold": "5",
                    "thresholdDuration": 300,
                    "thresholdOccurrences": "ALL"
                }],
                "nrql": { "query": "SELECT count(*) FROM Transaction" },
                "signal": { "fillOption": "NONE", "aggregationMethod": "EVENT_FLOW" },
                "alertsPolicyRef": { "name": "my-policy" }
            }
        }))
        .expect("valid manifest");

        let params = spec.for_provider;
        assert_eq!(params.condition_type, NrqlConditionType::Static);
        assert_eq!(params.signal.aggregation_method, Some(AggregationMethod::EventFlow));
        assert_eq!(params.alerts_policy_ref, Some(Reference::new("my-policy")));
        assert!(params.policy_id.is_empty());
        assert!(params.expiration.is_none());
    }
}
