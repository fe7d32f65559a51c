pub mod aggregate;
pub mod fit;
pub mod rank;
pub mod trigger;

use crate::types::config::ScoringPolicy;
use crate::types::scoring::ScoredResult;
use crate::types::signals::SignalRecord;
use chrono::NaiveDate;

/// Scores one record in isolation: fit and trigger run independently and are
/// merged by the aggregator.
pub fn score_record(record: &SignalRecord, now: NaiveDate, policy: &ScoringPolicy) -> ScoredResult {
    let fit = fit::compute_fit_score(record, &policy.fit);
    let trigger = trigger::compute_trigger(record, now, &policy.trigger);
    ScoredResult {
        highlights: highlights(record),
        ..aggregate::aggregate(&record.domain, &fit, &trigger, &policy.aggregate)
    }
}

/// Descriptive context lines; they never change a score.
pub fn highlights(record: &SignalRecord) -> Vec<String> {
    let mut lines = Vec::new();
    if !record.top_cloud_services.is_empty() {
        lines.push(format!(
            "Top cloud services: {}",
            record.top_cloud_services.join(", ")
        ));
    }
    if !record.top_spend_categories.is_empty() {
        lines.push(format!(
            "Top IT spend areas: {}",
            record.top_spend_categories.join(", ")
        ));
    }
    lines
}
