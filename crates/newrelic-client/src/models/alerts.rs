//! Alerts models: policies and NRQL conditions
//!
//! Input types are the request payloads sent to NerdGraph. The controller
//! also uses them as the canonical form when comparing desired and observed
//! state, so optional scalars that New Relic echoes back as empty strings
//! are plain `String`s skipped when empty.

use crate::error::NewRelicError;
use serde::{Deserialize, Serialize};

/// Policy as returned by NerdGraph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AlertsPolicy {
    #[serde(default)]
    pub account_id: Option<i64>,
    pub id: String,
    #[serde(default)]
    pub incident_preference: String,
    pub name: String,
}

/// Payload of `alertsPolicyCreate` and `alertsPolicyUpdate`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AlertsPolicyInput {
    pub incident_preference: String,
    pub name: String,
}

/// Policy as listed by the REST v2 API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RestPolicy {
    pub id: i64,
    #[serde(default)]
    pub incident_preference: String,
    pub name: String,
}

/// REST v2 `GET /alerts_policies.json` response
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RestPolicyList {
    #[serde(default)]
    pub policies: Vec<RestPolicy>,
}

/// Channels attached to a policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PolicyChannels {
    pub id: i64,
    #[serde(default)]
    pub channel_ids: Vec<i64>,
}

/// REST v2 `PUT /alerts_policy_channels.json` response
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PolicyChannelsResponse {
    pub policy: PolicyChannels,
}

/// A NRQL condition threshold term
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NrqlConditionTerm {
    pub operator: String,
    pub priority: String,
    #[serde(default)]
    pub threshold: Option<f64>,
    pub threshold_duration: i64,
    pub threshold_occurrences: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NrqlConditionQuery {
    pub query: String,
}

/// Signal settings, shared by the create payload and the observed condition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NrqlConditionSignal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_window: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_delay: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_offset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_option: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_delay: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_timer: Option<i64>,
}

/// Loss-of-signal settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NrqlConditionExpiration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_duration: Option<i64>,
    #[serde(default)]
    pub open_violation_on_expiration: bool,
    #[serde(default)]
    pub close_violations_on_expiration: bool,
}

/// Payload of the static/baseline condition create mutations
///
/// `condition_type` selects the mutation and is stripped before sending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NrqlConditionCreateInput {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub condition_type: String,
    pub name: String,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub runbook_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation_time_limit_seconds: Option<i64>,
    pub nrql: NrqlConditionQuery,
    pub terms: Vec<NrqlConditionTerm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<NrqlConditionSignal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<NrqlConditionExpiration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_direction: Option<String>,
}

/// Payload of the static/baseline condition update mutations
///
/// Every field is optional; New Relic leaves omitted fields untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NrqlConditionUpdateInput {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub condition_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runbook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation_time_limit_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nrql: Option<NrqlConditionQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<Vec<NrqlConditionTerm>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<NrqlConditionSignal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<NrqlConditionExpiration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_direction: Option<String>,
}

impl TryFrom<&NrqlConditionCreateInput> for NrqlConditionUpdateInput {
    type Error = NewRelicError;

    /// Converts through JSON so both payloads share one source of truth.
    fn try_from(input: &NrqlConditionCreateInput) -> Result<Self, Self::Error> {
        let value = serde_json::to_value(input)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// NRQL condition as returned by NerdGraph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NrqlAlertCondition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub runbook_url: Option<String>,
    #[serde(default)]
    pub policy_id: String,
    #[serde(rename = "type", default)]
    pub condition_type: String,
    #[serde(default)]
    pub violation_time_limit_seconds: Option<i64>,
    #[serde(default)]
    pub nrql: NrqlConditionQuery,
    #[serde(default)]
    pub terms: Vec<NrqlConditionTerm>,
    #[serde(default)]
    pub signal: Option<NrqlConditionSignal>,
    #[serde(default)]
    pub expiration: Option<NrqlConditionExpiration>,
    #[serde(default)]
    pub baseline_direction: Option<String>,
}

/// Criteria for `nrqlConditionsSearch`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NrqlConditionsSearchCriteria {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub policy_id: String,
}
