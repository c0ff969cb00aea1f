//! Dashboard Custom Resource Definition
//!
//! Manages a New Relic dashboard: pages, widgets and template variables.
//! Page GUIDs and widget IDs are written back by the controller after the
//! dashboard is created or updated.

use crate::common::{Managed, ResourceSpec, ResourceStatus};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// DashboardSpec defines the desired state of a dashboard
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
    group = "newrelic.crossplane.io",
    version = "v1alpha1",
    kind = "Dashboard",
    status = "DashboardStatus",
    category = "newrelic",
    printcolumn = r#"{"name":"GUID","type":"string","jsonPath":".status.atProvider.guid"}"#,
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"SYNCED","type":"string","jsonPath":".status.conditions[?(@.type=='Synced')].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSpec {
    #[serde(flatten)]
    pub resource: ResourceSpec,

    pub for_provider: DashboardParameters,
}

/// Configurable fields of a dashboard
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardParameters {
    /// Account owning the dashboard, the ProviderConfig account when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Entity GUID assigned by New Relic (written back by the controller)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub guid: String,

    pub name: String,

    #[serde(default)]
    pub pages: Vec<DashboardPage>,

    /// PUBLIC_READ_WRITE when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<DashboardPermissions>,

    #[serde(default)]
    pub variables: Vec<DashboardVariable>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardPermissions {
    PublicReadWrite,
    PublicReadOnly,
    Private,
}

impl DashboardPermissions {
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardPermissions::PublicReadWrite => "PUBLIC_READ_WRITE",
            DashboardPermissions::PublicReadOnly => "PUBLIC_READ_ONLY",
            DashboardPermissions::Private => "PRIVATE",
        }
    }
}

/// A dashboard page
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Page GUID assigned by New Relic
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub guid: String,

    pub name: String,

    #[serde(default)]
    pub widgets: Vec<DashboardWidget>,
}

/// A widget on a page
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardWidget {
    /// Widget ID assigned by New Relic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub layout: DashboardWidgetLayout,

    #[serde(default)]
    pub title: String,

    pub visualization: DashboardWidgetVisualization,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<WidgetConfiguration>,
}

/// Visualization used by a widget
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardWidgetVisualization {
    /// Nerdpack artifact ID such as `viz.area` or `viz.billboard`
    pub id: String,
}

/// Grid position and size of a widget
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
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

/// Widget configuration: exactly one typed variant, or a raw payload
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum WidgetConfiguration {
    Area(NrqlQueriesConfiguration),
    Bar(NrqlQueriesConfiguration),
    Billboard(BillboardConfiguration),
    Line(NrqlQueriesConfiguration),
    Markdown(MarkdownConfiguration),
    Pie(NrqlQueriesConfiguration),
    Table(NrqlQueriesConfiguration),
    Raw(RawConfiguration),
}

/// Configuration shared by the query-driven chart widgets
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NrqlQueriesConfiguration {
    #[serde(default)]
    pub nrql_queries: Vec<WidgetNrqlQuery>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillboardConfiguration {
    #[serde(default)]
    pub nrql_queries: Vec<WidgetNrqlQuery>,

    #[serde(default)]
    pub thresholds: Vec<BillboardThreshold>,
}

/// Billboard threshold with a string value
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillboardThreshold {
    /// CRITICAL, NOT_ALERTING or WARNING
    pub alert_severity: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownConfiguration {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WidgetNrqlQuery {
    pub account_id: i64,
    pub query: String,
}

/// Untyped widget configuration sent as raw JSON
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nrql_queries: Option<Vec<WidgetNrqlQuery>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_options: Option<RawPlatformOptions>,

    /// Used by viz.bullet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,

    /// Used by viz.markdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Used by viz.billboard
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thresholds: Vec<RawThreshold>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawPlatformOptions {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ignore_time_range: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawThreshold {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_severity: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// Template variable local to the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardVariable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_values: Option<Vec<DashboardVariableDefaultItem>>,

    #[serde(default)]
    pub is_multi_selection: bool,

    /// Possible values of an ENUM variable
    #[serde(default)]
    pub items: Vec<DashboardVariableEnumItem>,

    /// Query of a NRQL variable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nrql_query: Option<DashboardVariableNrqlQuery>,

    pub name: String,

    /// DEFAULT, IDENTIFIER, NUMBER or STRING
    #[serde(default)]
    pub replacement_strategy: String,

    #[serde(default)]
    pub title: String,

    /// ENUM, NRQL or STRING
    #[serde(rename = "type", default)]
    pub variable_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardVariableDefaultItem {
    #[serde(default)]
    pub value: DashboardVariableDefaultValue,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardVariableDefaultValue {
    #[serde(default)]
    pub string: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardVariableEnumItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardVariableNrqlQuery {
    #[serde(default)]
    pub account_ids: Vec<i64>,
    pub query: String,
}

/// DashboardStatus defines the observed state of a dashboard
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatus {
    #[serde(flatten)]
    pub resource: ResourceStatus,

    #[serde(default)]
    pub at_provider: DashboardObservation,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardObservation {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub guid: String,
}

impl Managed for Dashboard {
    fn resource_spec(&self) -> &ResourceSpec {
        &self.spec.resource
    }

    fn resource_status(&self) -> Option<&ResourceStatus> {
        self.status.as_ref().map(|s| &s.resource)
    }

    fn external_id(&self) -> &str {
        &self.spec.for_provider.guid
    }

    fn at_provider(&self) -> serde_json::Value {
        serde_json::json!({ "guid": self.spec.for_provider.guid })
    }
}
