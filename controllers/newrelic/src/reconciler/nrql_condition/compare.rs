//! Decides whether an observed NRQL condition matches the desired input.

use super::translate::DEFAULT_FILL_OPTION;
use super::translate::STATIC_FILL_OPTION;
use newrelic_client::{
    NrqlAlertCondition, NrqlConditionCreateInput, NrqlConditionExpiration, NrqlConditionSignal,
    NrqlConditionTerm,
};

/// Field-by-field comparison; the first mismatch returns false.
///
/// Terms compare as a multiset. A missing signal or expiration on either side
/// compares as the empty group, so only differing effective values count.
pub fn is_up_to_date(desired: &NrqlConditionCreateInput, observed: &NrqlAlertCondition) -> bool {
    if desired.name != observed.name {
        return false;
    }
    if desired.condition_type != observed.condition_type {
        return false;
    }
    if desired.runbook_url != observed.runbook_url.as_deref().unwrap_or_default() {
        return false;
    }
    if desired.enabled != observed.enabled {
        return false;
    }
    if desired.violation_time_limit_seconds.unwrap_or(0)
        != observed.violation_time_limit_seconds.unwrap_or(0)
    {
        return false;
    }
    if !terms_are_equal(&desired.terms, &observed.terms) {
        return false;
    }
    if desired.nrql.query != observed.nrql.query {
        return false;
    }

    let empty_signal = NrqlConditionSignal::default();
    if !signals_are_equal(
        desired.signal.as_ref().unwrap_or(&empty_signal),
        observed.signal.as_ref().unwrap_or(&empty_signal),
    ) {
        return false;
    }

    let empty_expiration = NrqlConditionExpiration::default();
    expirations_are_equal(
        desired.expiration.as_ref().unwrap_or(&empty_expiration),
        observed.expiration.as_ref().unwrap_or(&empty_expiration),
    )
}

/// Sort key discriminating a term.
fn term_key(term: &NrqlConditionTerm) -> String {
    format!(
        "{}_{}_{}_{}_{:.6}",
        term.priority,
        term.threshold_duration,
        term.threshold_occurrences,
        term.operator,
        term.threshold.unwrap_or(0.0)
    )
}

pub fn terms_are_equal(desired: &[NrqlConditionTerm], observed: &[NrqlConditionTerm]) -> bool {
    let mut desired: Vec<String> = desired.iter().map(term_key).collect();
    let mut observed: Vec<String> = observed.iter().map(term_key).collect();
    desired.sort();
    observed.sort();
    desired == observed
}

pub fn signals_are_equal(desired: &NrqlConditionSignal, observed: &NrqlConditionSignal) -> bool {
    let desired_fill = desired.fill_option.as_deref().unwrap_or(DEFAULT_FILL_OPTION);
    let observed_fill = observed.fill_option.as_deref().unwrap_or(DEFAULT_FILL_OPTION);
    if desired_fill != observed_fill {
        return false;
    }

    if desired_fill == STATIC_FILL_OPTION {
        if let Some(fill_value) = desired.fill_value {
            if observed.fill_value != Some(fill_value) {
                return false;
            }
        }
    }

    if desired.aggregation_method != observed.aggregation_method {
        return false;
    }

    desired.evaluation_delay.unwrap_or(0) == observed.evaluation_delay.unwrap_or(0)
        && desired.evaluation_offset.unwrap_or(0) == observed.evaluation_offset.unwrap_or(0)
        && desired.aggregation_delay.unwrap_or(0) == observed.aggregation_delay.unwrap_or(0)
        && desired.aggregation_timer.unwrap_or(0) == observed.aggregation_timer.unwrap_or(0)
}

pub fn expirations_are_equal(desired: &NrqlConditionExpiration, observed: &NrqlConditionExpiration) -> bool {
    desired.expiration_duration == observed.expiration_duration
        && desired.open_violation_on_expiration == observed.open_violation_on_expiration
        && desired.close_violations_on_expiration == observed.close_violations_on_expiration
}
