//! Dashboard operations for MockNewRelicClient

use super::MockNewRelicClient;
use crate::error::NewRelicError;
use crate::models::*;

pub async fn get_dashboard_entity(client: &MockNewRelicClient, guid: &str) -> Result<DashboardEntity, NewRelicError> {
    client.dashboards
        .lock()
        .unwrap()
        .get(guid)
        .cloned()
        .ok_or_else(|| NewRelicError::NotFound("entity not found".to_string()))
}

pub async fn search_dashboards_by_name(client: &MockNewRelicClient, name: &str) -> Result<Vec<DashboardSearchResult>, NewRelicError> {
    let dashboards = client.dashboards.lock().unwrap();
    let mut matches: Vec<DashboardSearchResult> = dashboards
        .values()
        .filter(|d| d.name.contains(name))
        .map(|d| DashboardSearchResult {
            guid: d.guid.clone(),
            name: d.name.clone(),
            account_id: d.account_id,
        })
        .collect();
    matches.sort_by(|a, b| a.guid.cmp(&b.guid));
    Ok(matches)
}

pub async fn create_dashboard(client: &MockNewRelicClient, account_id: i64, input: &DashboardInput) -> Result<DashboardMutationResult, NewRelicError> {
    if let Some(result) = injected_error(client) {
        return Ok(result);
    }

    let guid = format!("dashboard-{}", client.next_id());
    let entity = build_entity(client, guid, Some(account_id), input);
    client.add_dashboard(entity.clone());
    Ok(DashboardMutationResult {
        entity_result: Some(entity),
        errors: Vec::new(),
    })
}

pub async fn update_dashboard(client: &MockNewRelicClient, guid: &str, input: &DashboardInput) -> Result<DashboardMutationResult, NewRelicError> {
    if let Some(result) = injected_error(client) {
        return Ok(result);
    }

    let account_id = client
        .dashboard(guid)
        .ok_or_else(|| NewRelicError::NotFound("entity not found".to_string()))?
        .account_id;
    let entity = build_entity(client, guid.to_string(), account_id, input);
    client.add_dashboard(entity.clone());
    Ok(DashboardMutationResult {
        entity_result: Some(entity),
        errors: Vec::new(),
    })
}

pub async fn delete_dashboard(client: &MockNewRelicClient, guid: &str) -> Result<(), NewRelicError> {
    client.dashboards
        .lock()
        .unwrap()
        .remove(guid)
        .map(|_| ())
        .ok_or_else(|| NewRelicError::NotFound("entity not found".to_string()))
}

fn injected_error(client: &MockNewRelicClient) -> Option<DashboardMutationResult> {
    let description = client.dashboard_mutation_error.lock().unwrap().clone()?;
    Some(DashboardMutationResult {
        entity_result: None,
        errors: vec![DashboardMutationError {
            description,
            error_type: "INVALID_INPUT".to_string(),
        }],
    })
}

/// Echo the input back as an entity, assigning identifiers that are missing.
fn build_entity(client: &MockNewRelicClient, guid: String, account_id: Option<i64>, input: &DashboardInput) -> DashboardEntity {
    let pages = input
        .pages
        .iter()
        .map(|page| DashboardEntityPage {
            guid: if page.guid.is_empty() {
                format!("page-{}", client.next_id())
            } else {
                page.guid.clone()
            },
            name: page.name.clone(),
            description: Some(page.description.clone()).filter(|d| !d.is_empty()),
            widgets: page
                .widgets
                .iter()
                .map(|widget| DashboardEntityWidget {
                    id: if widget.id.is_empty() {
                        client.next_id().to_string()
                    } else {
                        widget.id.clone()
                    },
                    title: Some(widget.title.clone()),
                    layout: Some(widget.layout.clone()),
                    visualization: Some(widget.visualization.clone()),
                    configuration: widget.configuration.clone(),
                    raw_configuration: widget.raw_configuration.clone(),
                })
                .collect(),
        })
        .collect();

    let variables = input
        .variables
        .iter()
        .map(|variable| DashboardEntityVariable {
            default_values: Some(variable.default_values.clone()),
            is_multi_selection: Some(variable.is_multi_selection),
            items: Some(variable.items.clone()),
            nrql_query: variable.nrql_query.clone(),
            name: variable.name.clone(),
            replacement_strategy: Some(variable.replacement_strategy.clone()),
            title: Some(variable.title.clone()),
            variable_type: Some(variable.variable_type.clone()),
        })
        .collect();

    DashboardEntity {
        guid,
        account_id,
        name: input.name.clone(),
        description: Some(input.description.clone()).filter(|d| !d.is_empty()),
        permissions: Some(input.permissions.clone()),
        pages,
        variables,
    }
}
