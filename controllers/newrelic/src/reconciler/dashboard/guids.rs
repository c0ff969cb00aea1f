//! Copy identifiers New Relic assigned back into the Dashboard spec.
//!
//! Pages are matched by name and widgets by title plus exact layout. When two
//! widgets on a page share both, they receive the same ID.

use crds::{DashboardParameters, DashboardWidget};
use newrelic_client::{DashboardEntity, DashboardEntityWidget};

/// Returns whether anything in `params` changed.
pub fn write_back(params: &mut DashboardParameters, entity: &DashboardEntity) -> bool {
    let mut changed = false;

    if !entity.guid.is_empty() && params.guid != entity.guid {
        params.guid = entity.guid.clone();
        changed = true;
    }

    for page in params.pages.iter_mut() {
        let Some(observed) = entity.pages.iter().find(|p| p.name == page.name) else {
            continue;
        };
        if page.guid != observed.guid {
            page.guid = observed.guid.clone();
            changed = true;
        }

        for widget in page.widgets.iter_mut() {
            let Some(id) = observed.widgets.iter().find(|w| same_widget(widget, w)).map(|w| &w.id) else {
                continue;
            };
            if widget.id.as_deref() != Some(id.as_str()) {
                widget.id = Some(id.clone());
                changed = true;
            }
        }
    }

    changed
}

fn same_widget(desired: &DashboardWidget, observed: &DashboardEntityWidget) -> bool {
    if observed.title.as_deref().unwrap_or_default() != desired.title {
        return false;
    }
    let Some(layout) = &observed.layout else {
        return false;
    };
    layout.row == desired.layout.row
        && layout.column == desired.layout.column
        && layout.width == desired.layout.width
        && layout.height == desired.layout.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use newrelic_client::{DashboardEntityPage, DashboardWidgetLayout};

    fn entity_widget(id: &str, title: &str, row: i64, column: i64) -> DashboardEntityWidget {
        DashboardEntityWidget {
            id: id.to_string(),
            title: Some(title.to_string()),
            layout: Some(DashboardWidgetLayout {
                column,
                height: 3,
                row,
                width: 4,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn matching_pages_and_widgets_get_identifiers() {
        let mut cr = create_test_dashboard("checkout");
        let entity = DashboardEntity {
            guid: "dashboard-1".to_string(),
            pages: vec![DashboardEntityPage {
                guid: "page-1".to_string(),
                name: "overview".to_string(),
                widgets: vec![entity_widget("11", "errors", 1, 1), entity_widget("12", "throughput", 2, 5)],
                ..Default::default()
            }],
            ..Default::default()
        };

        assert!(write_back(&mut cr.spec.for_provider, &entity));

        let params = &cr.spec.for_provider;
        assert_eq!(params.guid, "dashboard-1");
        assert_eq!(params.pages[0].guid, "page-1");
        assert_eq!(params.pages[0].widgets[0].id.as_deref(), Some("11"));
        assert!(params.pages[0].widgets[1].id.is_none(), "layout differs, no ID");
        assert!(params.pages[1].guid.is_empty(), "page missing from entity");

        assert!(!write_back(&mut cr.spec.for_provider, &entity), "second pass changes nothing");
    }

    #[test]
    fn duplicate_title_and_layout_share_an_identifier() {
        let mut cr = create_test_dashboard("checkout");
        let duplicate = cr.spec.for_provider.pages[0].widgets[0].clone();
        cr.spec.for_provider.pages[0].widgets.push(duplicate);
        let entity = DashboardEntity {
            guid: "dashboard-1".to_string(),
            pages: vec![DashboardEntityPage {
                guid: "page-1".to_string(),
                name: "overview".to_string(),
                widgets: vec![entity_widget("11", "errors", 1, 1), entity_widget("13", "errors", 1, 1)],
                ..Default::default()
            }],
            ..Default::default()
        };

        write_back(&mut cr.spec.for_provider, &entity);

        let widgets = &cr.spec.for_provider.pages[0].widgets;
        assert_eq!(widgets[0].id.as_deref(), Some("11"));
        assert_eq!(widgets[2].id.as_deref(), Some("11"), "ambiguous match is lossy");
    }
}
