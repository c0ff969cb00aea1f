//! Dashboard spec to `DashboardInput`.
//!
//! Pages, widgets and billboard thresholds are put in a fixed order so that
//! the result can be compared with a normalized entity without caring about
//! the order they were authored in.

use crds::{
    BillboardThreshold, DashboardPage, DashboardParameters, DashboardPermissions, DashboardVariable,
    DashboardWidget, WidgetConfiguration, WidgetNrqlQuery,
};
use newrelic_client::{
    DashboardBillboardConfiguration, DashboardBillboardThreshold, DashboardInput,
    DashboardMarkdownConfiguration, DashboardNrqlQueriesConfiguration, DashboardPageInput,
    DashboardVariableInput, DashboardWidgetConfiguration, DashboardWidgetInput, DashboardWidgetLayout,
    DashboardWidgetNrqlQuery, DashboardWidgetVisualization,
};

use crate::reconciler::nrql_condition::translate::parse_number;

/// Permissions sent when the spec leaves them unset
pub const DEFAULT_PERMISSIONS: DashboardPermissions = DashboardPermissions::PublicReadWrite;

pub fn dashboard_input(params: &DashboardParameters) -> Result<DashboardInput, serde_json::Error> {
    let mut pages = params.pages.iter().map(page_input).collect::<Result<Vec<_>, _>>()?;
    sort_pages(&mut pages);

    Ok(DashboardInput {
        name: params.name.clone(),
        description: params.description.clone().unwrap_or_default(),
        permissions: params.permissions.unwrap_or(DEFAULT_PERMISSIONS).as_str().to_string(),
        pages,
        variables: params.variables.iter().map(variable_input).collect(),
    })
}

fn page_input(page: &DashboardPage) -> Result<DashboardPageInput, serde_json::Error> {
    let mut widgets = page.widgets.iter().map(widget_input).collect::<Result<Vec<_>, _>>()?;
    sort_widgets(&mut widgets);

    Ok(DashboardPageInput {
        guid: page.guid.clone(),
        name: page.name.clone(),
        description: page.description.clone().unwrap_or_default(),
        widgets,
    })
}

fn widget_input(widget: &DashboardWidget) -> Result<DashboardWidgetInput, serde_json::Error> {
    let (configuration, raw_configuration) = match &widget.configuration {
        Some(WidgetConfiguration::Raw(raw)) => (None, Some(serde_json::to_value(raw)?)),
        Some(typed) => (Some(typed_configuration(typed)), None),
        None => (None, None),
    };

    Ok(DashboardWidgetInput {
        id: widget.id.clone().unwrap_or_default(),
        title: widget.title.clone(),
        layout: DashboardWidgetLayout {
            column: widget.layout.column,
            height: widget.layout.height,
            row: widget.layout.row,
            width: widget.layout.width,
        },
        visualization: DashboardWidgetVisualization {
            id: widget.visualization.id.clone(),
        },
        configuration,
        raw_configuration,
    })
}

fn typed_configuration(configuration: &WidgetConfiguration) -> DashboardWidgetConfiguration {
    let queries = |queries: &[WidgetNrqlQuery]| {
        Some(DashboardNrqlQueriesConfiguration {
            nrql_queries: queries.iter().map(nrql_query).collect(),
        })
    };

    match configuration {
        WidgetConfiguration::Area(c) => DashboardWidgetConfiguration {
            area: queries(&c.nrql_queries),
            ..Default::default()
        },
        WidgetConfiguration::Bar(c) => DashboardWidgetConfiguration {
            bar: queries(&c.nrql_queries),
            ..Default::default()
        },
        WidgetConfiguration::Line(c) => DashboardWidgetConfiguration {
            line: queries(&c.nrql_queries),
            ..Default::default()
        },
        WidgetConfiguration::Pie(c) => DashboardWidgetConfiguration {
            pie: queries(&c.nrql_queries),
            ..Default::default()
        },
        WidgetConfiguration::Table(c) => DashboardWidgetConfiguration {
            table: queries(&c.nrql_queries),
            ..Default::default()
        },
        WidgetConfiguration::Billboard(c) => {
            let mut thresholds: Vec<DashboardBillboardThreshold> = c.thresholds.iter().map(threshold).collect();
            sort_thresholds(&mut thresholds);
            DashboardWidgetConfiguration {
                billboard: Some(DashboardBillboardConfiguration {
                    nrql_queries: c.nrql_queries.iter().map(nrql_query).collect(),
                    thresholds,
                }),
                ..Default::default()
            }
        }
        WidgetConfiguration::Markdown(c) => DashboardWidgetConfiguration {
            markdown: Some(DashboardMarkdownConfiguration { text: c.text.clone() }),
            ..Default::default()
        },
        // Raw payloads travel in raw_configuration
        WidgetConfiguration::Raw(_) => DashboardWidgetConfiguration::default(),
    }
}

fn nrql_query(query: &WidgetNrqlQuery) -> DashboardWidgetNrqlQuery {
    DashboardWidgetNrqlQuery {
        account_id: query.account_id,
        query: query.query.clone(),
    }
}

fn threshold(threshold: &BillboardThreshold) -> DashboardBillboardThreshold {
    DashboardBillboardThreshold {
        alert_severity: Some(threshold.alert_severity.clone()),
        value: Some(parse_number(&threshold.value)),
    }
}

fn variable_input(variable: &DashboardVariable) -> DashboardVariableInput {
    DashboardVariableInput {
        default_values: variable
            .default_values
            .iter()
            .flatten()
            .map(|item| newrelic_client::DashboardVariableDefaultItem {
                value: newrelic_client::DashboardVariableDefaultValue {
                    string: item.value.string.clone(),
                },
            })
            .collect(),
        is_multi_selection: variable.is_multi_selection,
        items: variable
            .items
            .iter()
            .map(|item| newrelic_client::DashboardVariableEnumItem {
                title: item.title.clone(),
                value: item.value.clone(),
            })
            .collect(),
        nrql_query: variable.nrql_query.as_ref().map(|q| newrelic_client::DashboardVariableNrqlQuery {
            account_ids: q.account_ids.clone(),
            query: q.query.clone(),
        }),
        name: variable.name.clone(),
        replacement_strategy: variable.replacement_strategy.clone(),
        title: variable.title.clone(),
        variable_type: variable.variable_type.clone(),
    }
}

/// Pages order by GUID, then name.
pub fn sort_pages(pages: &mut [DashboardPageInput]) {
    pages.sort_by(|a, b| (a.guid.as_str(), a.name.as_str()).cmp(&(b.guid.as_str(), b.name.as_str())));
}

/// Widgets order by ID, then title, then layout.
pub fn sort_widgets(widgets: &mut [DashboardWidgetInput]) {
    widgets.sort_by_cached_key(|w| (w.id.clone(), w.title.clone(), layout_key(&w.layout)));
}

pub fn sort_thresholds(thresholds: &mut [DashboardBillboardThreshold]) {
    thresholds.sort_by_cached_key(threshold_key);
}

/// Row, height, width and column concatenated.
pub fn layout_key(layout: &DashboardWidgetLayout) -> String {
    format!("{}{}{}{}", layout.row, layout.height, layout.width, layout.column)
}

fn threshold_key(threshold: &DashboardBillboardThreshold) -> String {
    format!(
        "{}_{:.6}",
        threshold.alert_severity.as_deref().unwrap_or_default(),
        threshold.value.unwrap_or(0.0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use crds::RawConfiguration;

    #[test]
    fn unset_permissions_default_to_public_read_write() {
        let cr = create_test_dashboard("checkout");
        let input = dashboard_input(&cr.spec.for_provider).expect("input");
        assert_eq!(input.permissions, "PUBLIC_READ_WRITE");

        let mut private = cr;
        private.spec.for_provider.permissions = Some(DashboardPermissions::Private);
        let input = dashboard_input(&private.spec.for_provider).expect("input");
        assert_eq!(input.permissions, "PRIVATE");
    }

    #[test]
    fn pages_and_widgets_are_sorted() {
        let cr = create_test_dashboard("checkout");
        let input = dashboard_input(&cr.spec.for_provider).expect("input");

        let pages: Vec<&str> = input.pages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(pages, vec!["notes", "overview"]);

        let overview = &input.pages[1];
        let widgets: Vec<&str> = overview.widgets.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(widgets, vec!["errors", "throughput"]);
    }

    #[test]
    fn billboard_thresholds_are_parsed_and_sorted() {
        let cr = create_test_dashboard("checkout");
        let input = dashboard_input(&cr.spec.for_provider).expect("input");

        let billboard = input.pages[1].widgets[0]
            .configuration
            .as_ref()
            .and_then(|c| c.billboard.as_ref())
            .expect("billboard");
        let thresholds: Vec<(Option<&str>, Option<f64>)> = billboard
            .thresholds
            .iter()
            .map(|t| (t.alert_severity.as_deref(), t.value))
            .collect();
        assert_eq!(
            thresholds,
            vec![(Some("CRITICAL"), Some(90.0)), (Some("WARNING"), Some(50.0))]
        );
    }

    #[test]
    fn raw_configuration_is_sent_as_json() {
        let mut cr = create_test_dashboard("checkout");
        cr.spec.for_provider.pages[0].widgets[1].configuration = Some(WidgetConfiguration::Raw(RawConfiguration {
            limit: Some(100.0),
            ..Default::default()
        }));

        let input = dashboard_input(&cr.spec.for_provider).expect("input");

        let throughput = &input.pages[1].widgets[1];
        assert!(throughput.configuration.is_none());
        assert_eq!(throughput.raw_configuration, Some(serde_json::json!({ "limit": 100.0 })));
    }

    #[test]
    fn unset_default_values_become_empty() {
        let cr = create_test_dashboard("checkout");
        let input = dashboard_input(&cr.spec.for_provider).expect("input");

        let variable = &input.variables[0];
        assert!(variable.default_values.is_empty());
        assert_eq!(variable.variable_type, "NRQL");
        assert_eq!(
            variable.nrql_query.as_ref().map(|q| q.account_ids.clone()),
            Some(vec![TEST_ACCOUNT_ID])
        );
    }
}
