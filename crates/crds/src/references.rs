//! Cross-resource references
//!
//! A managed resource can point at another managed resource either by name
//! (`Reference`) or by labels (`Selector`). The controller resolves either
//! form into the referenced resource's external identifier.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference to a cluster-scoped managed resource by name
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Name of the referenced resource
    pub name: String,
}

impl Reference {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Selects a managed resource by labels
///
/// The first matching resource wins; resolution records the chosen resource
/// as a `Reference` so later reconciles stay pinned to it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub match_labels: BTreeMap<String, String>,
}

impl Selector {
    /// Renders the labels as a Kubernetes label selector string.
    pub fn to_label_selector(&self) -> String {
        self.match_labels
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_selector_is_sorted_and_comma_separated() {
        let mut selector = Selector::default();
        selector.match_labels.insert("team".to_string(), "sre".to_string());
        selector.match_labels.insert("env".to_string(), "prod".to_string());
        assert_eq!(selector.to_label_selector(), "env=prod,team=sre");
    }
}
