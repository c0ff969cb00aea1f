//! Test utilities for unit testing the resource adapters
//!
//! This module provides helpers for creating test data and wiring adapters to
//! the in-memory New Relic client.

#[cfg(test)]
use crate::connector::Connection;
#[cfg(test)]
use crds::*;
#[cfg(test)]
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
#[cfg(test)]
use newrelic_client::MockNewRelicClient;
#[cfg(test)]
use std::sync::Arc;

/// Account every test adapter is bound to
#[cfg(test)]
pub const TEST_ACCOUNT_ID: i64 = 1234567;

/// Connection backed by a clone of `mock`; the stores are shared.
#[cfg(test)]
pub fn mock_connection(mock: &MockNewRelicClient) -> Connection {
    Connection {
        client: Arc::new(mock.clone()),
        account_id: TEST_ACCOUNT_ID,
    }
}

#[cfg(test)]
fn test_metadata(name: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

/// Helper to create a test AlertsPolicy CRD
#[cfg(test)]
pub fn create_test_alerts_policy(name: &str, id: &str) -> AlertsPolicy {
    AlertsPolicy {
        metadata: test_metadata(name),
        spec: AlertsPolicySpec {
            resource: ResourceSpec::default(),
            for_provider: AlertsPolicyParameters {
                id: id.to_string(),
                incident_preference: IncidentPreference::PerPolicy,
                name: format!("{}-policy", name),
                channel_ids: Vec::new(),
            },
        },
        status: None,
    }
}

/// Helper to create a test static NrqlAlertCondition CRD
#[cfg(test)]
pub fn create_test_nrql_condition(name: &str, policy_id: &str) -> NrqlAlertCondition {
    NrqlAlertCondition {
        metadata: test_metadata(name),
        spec: NrqlAlertConditionSpec {
            resource: ResourceSpec::default(),
            for_provider: NrqlAlertConditionParameters {
                condition_type: NrqlConditionType::Static,
                name: "test_nrql".to_string(),
                runbook_url: Some("https://runbooks.example.com/errors".to_string()),
                enabled: true,
                violation_time_limit_seconds: Some(86400),
                terms: vec![
                    crds::NrqlConditionTerm {
                        operator: "ABOVE".to_string(),
                        priority: "CRITICAL".to_string(),
                        threshold: "5".to_string(),
                        threshold_duration: 300,
                        threshold_occurrences: "ALL".to_string(),
                    },
                    crds::NrqlConditionTerm {
                        operator: "ABOVE".to_string(),
                        priority: "WARNING".to_string(),
                        threshold: "2.5".to_string(),
                        threshold_duration: 600,
                        threshold_occurrences: "AT_LEAST_ONCE".to_string(),
                    },
                ],
                nrql: Nrql {
                    query: "SELECT count(*) FROM TransactionError".to_string(),
                },
                signal: Signal {
                    aggregation_window: Some(60),
                    fill_option: "STATIC".to_string(),
                    fill_value: Some("0".to_string()),
                    aggregation_method: Some(AggregationMethod::EventFlow),
                    aggregation_delay: Some(120),
                    ..Default::default()
                },
                expiration: Some(Expiration {
                    expiration_duration: Some(600),
                    open_violation_on_expiration: false,
                    close_violations_on_expiration: true,
                }),
                policy_id: policy_id.to_string(),
                ..Default::default()
            },
        },
        status: None,
    }
}

/// Helper to create a test Dashboard CRD with two pages
#[cfg(test)]
pub fn create_test_dashboard(name: &str) -> Dashboard {
    Dashboard {
        metadata: test_metadata(name),
        spec: DashboardSpec {
            resource: ResourceSpec::default(),
            for_provider: DashboardParameters {
                name: "test_dashboard".to_string(),
                description: Some("checkout service".to_string()),
                pages: vec![
                    DashboardPage {
                        name: "overview".to_string(),
                        widgets: vec![
                            test_widget(
                                "errors",
                                1,
                                1,
                                Some(WidgetConfiguration::Billboard(BillboardConfiguration {
                                    nrql_queries: vec![test_query("SELECT count(*) FROM TransactionError")],
                                    thresholds: vec![
                                        BillboardThreshold {
                                            alert_severity: "WARNING".to_string(),
                                            value: "50".to_string(),
                                        },
                                        BillboardThreshold {
                                            alert_severity: "CRITICAL".to_string(),
                                            value: "90".to_string(),
                                        },
                                    ],
                                })),
                            ),
                            test_widget(
                                "throughput",
                                1,
                                5,
                                Some(WidgetConfiguration::Line(NrqlQueriesConfiguration {
                                    nrql_queries: vec![test_query("SELECT rate(count(*), 1 minute) FROM Transaction")],
                                })),
                            ),
                        ],
                        ..Default::default()
                    },
                    DashboardPage {
                        name: "notes".to_string(),
                        description: Some("runbook links".to_string()),
                        widgets: vec![test_widget(
                            "readme",
                            1,
                            1,
                            Some(WidgetConfiguration::Markdown(MarkdownConfiguration {
                                text: "# Checkout".to_string(),
                            })),
                        )],
                        ..Default::default()
                    },
                ],
                variables: vec![DashboardVariable {
                    name: "appName".to_string(),
                    title: "Application".to_string(),
                    variable_type: "NRQL".to_string(),
                    replacement_strategy: "STRING".to_string(),
                    nrql_query: Some(crds::DashboardVariableNrqlQuery {
                        account_ids: vec![TEST_ACCOUNT_ID],
                        query: "SELECT uniques(appName) FROM Transaction".to_string(),
                    }),
                    ..Default::default()
                }],
                ..Default::default()
            },
        },
        status: None,
    }
}

/// Helper to create a dashboard widget at `row`/`column` with a 4x3 footprint
#[cfg(test)]
pub fn test_widget(title: &str, row: i64, column: i64, configuration: Option<WidgetConfiguration>) -> DashboardWidget {
    let visualization = match &configuration {
        Some(WidgetConfiguration::Billboard(_)) => "viz.billboard",
        Some(WidgetConfiguration::Markdown(_)) => "viz.markdown",
        Some(WidgetConfiguration::Line(_)) => "viz.line",
        _ => "viz.bullet",
    };
    DashboardWidget {
        id: None,
        layout: crds::DashboardWidgetLayout {
            column,
            height: 3,
            row,
            width: 4,
        },
        title: title.to_string(),
        visualization: crds::DashboardWidgetVisualization {
            id: visualization.to_string(),
        },
        configuration,
    }
}

#[cfg(test)]
fn test_query(query: &str) -> WidgetNrqlQuery {
    WidgetNrqlQuery {
        account_id: TEST_ACCOUNT_ID,
        query: query.to_string(),
    }
}
