//! Dashboard models
//!
//! `DashboardInput` and its children are the `dashboardCreate` /
//! `dashboardUpdate` payload. `DashboardEntity` is what `actor.entity`
//! returns for a dashboard GUID.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub permissions: String,
    #[serde(default)]
    pub pages: Vec<DashboardPageInput>,
    #[serde(default)]
    pub variables: Vec<DashboardVariableInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPageInput {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub guid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub widgets: Vec<DashboardWidgetInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardWidgetInput {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub layout: DashboardWidgetLayout,
    pub visualization: DashboardWidgetVisualization,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<DashboardWidgetConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_configuration: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardWidgetLayout {
    #[serde(default)]
    pub column: i64,
    #[serde(default)]
    pub height: i64,
    #[serde(default)]
    pub row: i64,
    #[serde(default)]
    pub width: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardWidgetVisualization {
    pub id: String,
}

/// Typed widget configuration; at most one member is set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardWidgetConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<DashboardNrqlQueriesConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar: Option<DashboardNrqlQueriesConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billboard: Option<DashboardBillboardConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<DashboardNrqlQueriesConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<DashboardMarkdownConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pie: Option<DashboardNrqlQueriesConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<DashboardNrqlQueriesConfiguration>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardNrqlQueriesConfiguration {
    #[serde(default)]
    pub nrql_queries: Vec<DashboardWidgetNrqlQuery>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardBillboardConfiguration {
    #[serde(default)]
    pub nrql_queries: Vec<DashboardWidgetNrqlQuery>,
    #[serde(default)]
    pub thresholds: Vec<DashboardBillboardThreshold>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardBillboardThreshold {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMarkdownConfiguration {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardWidgetNrqlQuery {
    pub account_id: i64,
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardVariableInput {
    #[serde(default)]
    pub default_values: Vec<DashboardVariableDefaultItem>,
    #[serde(default)]
    pub is_multi_selection: bool,
    #[serde(default)]
    pub items: Vec<DashboardVariableEnumItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nrql_query: Option<DashboardVariableNrqlQuery>,
    pub name: String,
    #[serde(default)]
    pub replacement_strategy: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub variable_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardVariableDefaultItem {
    #[serde(default)]
    pub value: DashboardVariableDefaultValue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardVariableDefaultValue {
    #[serde(default)]
    pub string: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardVariableEnumItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardVariableNrqlQuery {
    #[serde(default)]
    pub account_ids: Vec<i64>,
    #[serde(default)]
    pub query: String,
}

/// Dashboard entity as returned by `actor.entity` and mutation results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEntity {
    #[serde(default)]
    pub guid: String,
    #[serde(default)]
    pub account_id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Option<String>,
    #[serde(default)]
    pub pages: Vec<DashboardEntityPage>,
    #[serde(default)]
    pub variables: Vec<DashboardEntityVariable>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEntityPage {
    #[serde(default)]
    pub guid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub widgets: Vec<DashboardEntityWidget>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEntityWidget {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub layout: Option<DashboardWidgetLayout>,
    #[serde(default)]
    pub visualization: Option<DashboardWidgetVisualization>,
    #[serde(default)]
    pub configuration: Option<DashboardWidgetConfiguration>,
    #[serde(default)]
    pub raw_configuration: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEntityVariable {
    #[serde(default)]
    pub default_values: Option<Vec<DashboardVariableDefaultItem>>,
    #[serde(default)]
    pub is_multi_selection: Option<bool>,
    #[serde(default)]
    pub items: Option<Vec<DashboardVariableEnumItem>>,
    #[serde(default)]
    pub nrql_query: Option<DashboardVariableNrqlQuery>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub replacement_strategy: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub variable_type: Option<String>,
}

/// Result of `dashboardCreate` / `dashboardUpdate`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMutationResult {
    #[serde(default)]
    pub entity_result: Option<DashboardEntity>,
    #[serde(default)]
    pub errors: Vec<DashboardMutationError>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMutationError {
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub error_type: String,
}

/// Entry of an `entitySearch` for dashboards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSearchResult {
    pub guid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub account_id: Option<i64>,
}
