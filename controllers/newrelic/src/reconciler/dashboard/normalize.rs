//! Dashboard entity to `DashboardInput`, mirroring the translator's defaults and order.

use super::translate::{DEFAULT_PERMISSIONS, sort_pages, sort_thresholds, sort_widgets};
use newrelic_client::{
    DashboardEntity, DashboardEntityPage, DashboardEntityVariable, DashboardEntityWidget, DashboardInput,
    DashboardPageInput, DashboardVariableInput, DashboardWidgetInput,
};

pub fn entity_input(entity: &DashboardEntity) -> DashboardInput {
    let mut pages: Vec<DashboardPageInput> = entity.pages.iter().map(page_input).collect();
    sort_pages(&mut pages);

    DashboardInput {
        name: entity.name.clone(),
        description: entity.description.clone().unwrap_or_default(),
        permissions: entity
            .permissions
            .clone()
            .unwrap_or_else(|| DEFAULT_PERMISSIONS.as_str().to_string()),
        pages,
        variables: entity.variables.iter().map(variable_input).collect(),
    }
}

fn page_input(page: &DashboardEntityPage) -> DashboardPageInput {
    let mut widgets: Vec<DashboardWidgetInput> = page.widgets.iter().map(widget_input).collect();
    sort_widgets(&mut widgets);

    DashboardPageInput {
        guid: page.guid.clone(),
        name: page.name.clone(),
        description: page.description.clone().unwrap_or_default(),
        widgets,
    }
}

fn widget_input(widget: &DashboardEntityWidget) -> DashboardWidgetInput {
    let mut configuration = widget.configuration.clone();
    if let Some(billboard) = configuration.as_mut().and_then(|c| c.billboard.as_mut()) {
        sort_thresholds(&mut billboard.thresholds);
    }

    DashboardWidgetInput {
        id: widget.id.clone(),
        title: widget.title.clone().unwrap_or_default(),
        layout: widget.layout.clone().unwrap_or_default(),
        visualization: widget.visualization.clone().unwrap_or_default(),
        configuration,
        raw_configuration: widget.raw_configuration.clone(),
    }
}

fn variable_input(variable: &DashboardEntityVariable) -> DashboardVariableInput {
    DashboardVariableInput {
        default_values: variable.default_values.clone().unwrap_or_default(),
        is_multi_selection: variable.is_multi_selection.unwrap_or_default(),
        items: variable.items.clone().unwrap_or_default(),
        nrql_query: variable.nrql_query.clone(),
        name: variable.name.clone(),
        replacement_strategy: variable.replacement_strategy.clone().unwrap_or_default(),
        title: variable.title.clone().unwrap_or_default(),
        variable_type: variable.variable_type.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newrelic_client::{
        DashboardBillboardConfiguration, DashboardBillboardThreshold, DashboardWidgetConfiguration,
    };

    fn threshold(severity: &str, value: f64) -> DashboardBillboardThreshold {
        DashboardBillboardThreshold {
            alert_severity: Some(severity.to_string()),
            value: Some(value),
        }
    }

    #[test]
    fn missing_fields_take_defaults() {
        let entity = DashboardEntity {
            guid: "dashboard-1".to_string(),
            name: "checkout".to_string(),
            pages: vec![DashboardEntityPage {
                guid: "page-1".to_string(),
                name: "overview".to_string(),
                widgets: vec![DashboardEntityWidget {
                    id: "7".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            variables: vec![DashboardEntityVariable {
                name: "appName".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let input = entity_input(&entity);

        assert_eq!(input.permissions, "PUBLIC_READ_WRITE");
        assert_eq!(input.description, "");
        assert_eq!(input.pages[0].widgets[0].title, "");
        assert_eq!(input.pages[0].widgets[0].layout.width, 0);
        assert!(input.variables[0].items.is_empty());
        assert!(!input.variables[0].is_multi_selection);
    }

    #[test]
    fn pages_widgets_and_thresholds_are_sorted() {
        let billboard = DashboardWidgetConfiguration {
            billboard: Some(DashboardBillboardConfiguration {
                nrql_queries: Vec::new(),
                thresholds: vec![threshold("WARNING", 50.0), threshold("CRITICAL", 90.0)],
            }),
            ..Default::default()
        };
        let entity = DashboardEntity {
            pages: vec![
                DashboardEntityPage {
                    guid: "page-2".to_string(),
                    name: "b".to_string(),
                    widgets: vec![
                        DashboardEntityWidget {
                            id: "9".to_string(),
                            configuration: Some(billboard),
                            ..Default::default()
                        },
                        DashboardEntityWidget {
                            id: "8".to_string(),
                            ..Default::default()
                        },
                    ],
                    ..Default::default()
                },
                DashboardEntityPage {
                    guid: "page-1".to_string(),
                    name: "a".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let input = entity_input(&entity);

        assert_eq!(input.pages[0].guid, "page-1");
        let page = &input.pages[1];
        assert_eq!(page.widgets[0].id, "8");
        let thresholds = &page.widgets[1]
            .configuration
            .as_ref()
            .and_then(|c| c.billboard.as_ref())
            .expect("billboard")
            .thresholds;
        assert_eq!(thresholds[0].alert_severity.as_deref(), Some("CRITICAL"));
    }
}
