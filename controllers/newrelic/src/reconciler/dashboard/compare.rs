//! Dashboard equivalence.
//!
//! Both sides are `DashboardInput`s already in canonical order. They are
//! compared as JSON with empty values pruned, so `null`, `""`, `[]` and `{}`
//! all mean "unset". Raw widget configuration is never compared: New Relic
//! does not echo it back in the shape it was sent.

use newrelic_client::DashboardInput;
use serde_json::Value;

pub fn is_up_to_date(desired: &DashboardInput, observed: &DashboardInput) -> bool {
    let mut desired = desired.clone();
    let mut observed = observed.clone();
    strip_raw_configuration(&mut desired);
    strip_raw_configuration(&mut observed);
    drop_unrequested_configuration(&desired, &mut observed);

    match (serde_json::to_value(&desired), serde_json::to_value(&observed)) {
        (Ok(desired), Ok(observed)) => prune(desired) == prune(observed),
        _ => false,
    }
}

fn strip_raw_configuration(input: &mut DashboardInput) {
    for widget in input.pages.iter_mut().flat_map(|p| p.widgets.iter_mut()) {
        widget.raw_configuration = None;
    }
}

/// A widget with no typed configuration (raw or none) ignores whatever the
/// entity reports at the same position.
fn drop_unrequested_configuration(desired: &DashboardInput, observed: &mut DashboardInput) {
    for (desired_page, observed_page) in desired.pages.iter().zip(observed.pages.iter_mut()) {
        for (desired_widget, observed_widget) in desired_page.widgets.iter().zip(observed_page.widgets.iter_mut()) {
            if desired_widget.configuration.is_none() {
                observed_widget.configuration = None;
            }
        }
    }
}

/// Remove nulls, empty strings, empty arrays and empty objects, recursively.
pub fn prune(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, prune(v)))
                .filter(|(_, v)| !is_empty(v))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(prune).collect()),
        other => other,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
