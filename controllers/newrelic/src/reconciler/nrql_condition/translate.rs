//! NrqlAlertCondition spec to NerdGraph input.

use crds::{Expiration, NrqlAlertConditionParameters, Signal};
use newrelic_client::{
    NrqlConditionCreateInput, NrqlConditionExpiration, NrqlConditionQuery, NrqlConditionSignal,
    NrqlConditionTerm,
};

/// Fill option used when the spec leaves it empty
pub const DEFAULT_FILL_OPTION: &str = "NONE";

/// Fill option that carries a fill value
pub const STATIC_FILL_OPTION: &str = "STATIC";

/// Build the create input from the desired state.
///
/// Numeric strings that fail to parse become `0.0`.
pub fn condition_input(params: &NrqlAlertConditionParameters) -> NrqlConditionCreateInput {
    NrqlConditionCreateInput {
        condition_type: params.condition_type.as_str().to_string(),
        name: params.name.clone(),
        enabled: params.enabled,
        description: params.description.clone().unwrap_or_default(),
        runbook_url: params.runbook_url.clone().unwrap_or_default(),
        violation_time_limit_seconds: params.violation_time_limit_seconds,
        nrql: NrqlConditionQuery {
            query: params.nrql.query.clone(),
        },
        terms: params.terms.iter().map(term).collect(),
        signal: Some(signal(&params.signal)),
        expiration: Some(expiration(params.expiration.as_ref())),
        value_function: params.value_function.map(|f| f.as_str().to_string()),
        baseline_direction: params.baseline_direction.map(|d| d.as_str().to_string()),
    }
}

fn term(term: &crds::NrqlConditionTerm) -> NrqlConditionTerm {
    NrqlConditionTerm {
        operator: term.operator.clone(),
        priority: term.priority.clone(),
        threshold: Some(parse_number(&term.threshold)),
        threshold_duration: term.threshold_duration,
        threshold_occurrences: term.threshold_occurrences.clone(),
    }
}

fn signal(signal: &Signal) -> NrqlConditionSignal {
    let fill_option = if signal.fill_option.is_empty() {
        DEFAULT_FILL_OPTION.to_string()
    } else {
        signal.fill_option.clone()
    };
    // Only STATIC fill accepts a value
    let fill_value = if fill_option == STATIC_FILL_OPTION {
        signal.fill_value.as_deref().map(parse_number)
    } else {
        None
    };

    NrqlConditionSignal {
        aggregation_window: signal.aggregation_window,
        evaluation_delay: signal.evaluation_delay,
        evaluation_offset: signal.evaluation_offset,
        fill_option: Some(fill_option),
        fill_value,
        aggregation_method: signal.aggregation_method.map(|m| m.as_str().to_string()),
        aggregation_delay: signal.aggregation_delay,
        aggregation_timer: signal.aggregation_timer,
    }
}

fn expiration(expiration: Option<&Expiration>) -> NrqlConditionExpiration {
    let Some(expiration) = expiration else {
        return NrqlConditionExpiration::default();
    };
    NrqlConditionExpiration {
        expiration_duration: expiration.expiration_duration.filter(|d| *d > 0),
        open_violation_on_expiration: expiration.open_violation_on_expiration,
        close_violations_on_expiration: expiration.close_violations_on_expiration,
    }
}

pub(crate) fn parse_number(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_nrql_condition;
    use crds::{NrqlConditionType, ValueFunction};

    #[test]
    fn thresholds_are_parsed_and_invalid_ones_become_zero() {
        let mut cr = create_test_nrql_condition("errors", "1");
        cr.spec.for_provider.terms[1].threshold = "lots".to_string();

        let input = condition_input(&cr.spec.for_provider);

        assert_eq!(input.terms[0].threshold, Some(5.0));
        assert_eq!(input.terms[1].threshold, Some(0.0));
    }

    #[test]
    fn fill_value_only_travels_with_static_fill() {
        let mut cr = create_test_nrql_condition("errors", "1");
        let input = condition_input(&cr.spec.for_provider);
        let signal = input.signal.expect("signal");
        assert_eq!(signal.fill_option.as_deref(), Some("STATIC"));
        assert_eq!(signal.fill_value, Some(0.0));

        cr.spec.for_provider.signal.fill_option = "LAST_VALUE".to_string();
        let signal = condition_input(&cr.spec.for_provider).signal.expect("signal");
        assert!(signal.fill_value.is_none());
    }

    #[test]
    fn empty_fill_option_defaults_to_none() {
        let mut cr = create_test_nrql_condition("errors", "1");
        cr.spec.for_provider.signal.fill_option = String::new();

        let signal = condition_input(&cr.spec.for_provider).signal.expect("signal");

        assert_eq!(signal.fill_option.as_deref(), Some(DEFAULT_FILL_OPTION));
        assert!(signal.fill_value.is_none());
    }

    #[test]
    fn missing_expiration_becomes_empty_expiration() {
        let mut cr = create_test_nrql_condition("errors", "1");
        cr.spec.for_provider.expiration = None;
        let input = condition_input(&cr.spec.for_provider);
        assert_eq!(input.expiration, Some(NrqlConditionExpiration::default()));

        cr.spec.for_provider.expiration = Some(Expiration {
            expiration_duration: Some(0),
            ..Default::default()
        });
        let input = condition_input(&cr.spec.for_provider);
        let expiration = input.expiration.expect("expiration");
        assert!(expiration.expiration_duration.is_none(), "non-positive duration is dropped");
    }

    #[test]
    fn enums_are_rendered_as_api_strings() {
        let mut cr = create_test_nrql_condition("errors", "1");
        cr.spec.for_provider.condition_type = NrqlConditionType::Baseline;
        cr.spec.for_provider.value_function = Some(ValueFunction::SingleValue);

        let input = condition_input(&cr.spec.for_provider);

        assert_eq!(input.condition_type, "BASELINE");
        assert_eq!(input.value_function.as_deref(), Some("SINGLE_VALUE"));
        assert_eq!(
            input.signal.and_then(|s| s.aggregation_method).as_deref(),
            Some("EVENT_FLOW")
        );
    }
}
