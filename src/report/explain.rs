use crate::types::scoring::{ScoredResult, TriggerDriver};
use crate::types::signals::SignalRecord;
use chrono::NaiveDate;

/// Full breakdown of one scored domain: every factor with its cap, the two
/// timing sub-scores and how the final score was assembled.
pub fn to_explanation(
    record: &SignalRecord,
    result: &ScoredResult,
    as_of: NaiveDate,
    scoring_version: &str,
) -> String {
    let mut output = format!(
        "{} as of {} (scoring {})\n",
        result.domain, as_of, scoring_version
    );
    let company = [record.company_name.as_deref(), record.industry.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    if !company.is_empty() {
        output.push_str(&format!("Company: {}\n", company.join(", ")));
    }
    if !record.tech_installs.is_empty() {
        let names = record
            .tech_installs
            .iter()
            .map(|install| install.name.as_str())
            .collect::<Vec<_>>();
        output.push_str(&format!("Tech stack: {}\n", names.join(", ")));
    }
    for line in &result.highlights {
        output.push_str(&format!("{line}\n"));
    }
    output.push('\n');

    output.push_str("Fit factors:\n");
    let label_width = result
        .contributions
        .iter()
        .map(|contribution| contribution.factor.label().len())
        .max()
        .unwrap_or(0);
    for contribution in &result.contributions {
        let points = format!("{:.2}/{:.0}", contribution.points, contribution.cap);
        let evidence = contribution.evidence.as_deref().unwrap_or("unknown");
        output.push_str(&format!(
            "  {:<label_width$}  {:>11}  {}\n",
            contribution.factor.label(),
            points,
            evidence
        ));
    }
    output.push_str(&format!("  fit score: {:.2}\n\n", result.fit_score));

    let trigger = &result.trigger;
    output.push_str("Trigger:\n");
    output.push_str(&format!(
        "  contract renewal: {:.2} ({})\n",
        trigger.contract_score,
        match trigger.days_to_renewal {
            Some(days) if days < 0 => format!("{} days overdue", -days),
            Some(days) => format!("in {days} days"),
            None => "unknown".to_string(),
        }
    ));
    output.push_str(&format!(
        "  tech recency:     {:.2} ({})\n",
        trigger.recency_score,
        match trigger.days_since_verified {
            Some(days) if days < 0 => "verified date is in the future".to_string(),
            Some(days) => format!("verified {days} days ago"),
            None => "unknown".to_string(),
        }
    ));
    let driver = match trigger.driver {
        Some(TriggerDriver::ContractRenewal) => "contract renewal",
        Some(TriggerDriver::TechRecency) => "tech recency",
        None => "none",
    };
    output.push_str(&format!(
        "  combined {:.2} -> {} (boost +{:.0}, driver: {})\n\n",
        trigger.combined, trigger.badge, trigger.boost, driver
    ));

    output.push_str(&format!(
        "Final score: {:.2} = fit {:.2} + boost {:.0}\n",
        result.final_score, result.fit_score, result.trigger_boost
    ));
    output.push_str(&format!("Action: {}\n", result.action));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score_record;
    use crate::types::config::ScoringPolicy;
    use chrono::Duration;

    #[test]
    fn explanation_lists_every_factor_and_trigger_part() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).expect("valid date");
        let mut record = SignalRecord::new("acme.com");
        record.company_name = Some("Acme".to_string());
        record.industry = Some("Software".to_string());
        record.employee_count = Some(100_000);
        record.top_cloud_services = vec!["Google Cloud".to_string()];
        record.contract_renewal_date = Some(today - Duration::days(5));
        let result = score_record(&record, today, &ScoringPolicy::default());

        let rendered = to_explanation(&record, &result, today, "abc123");
        assert!(rendered.starts_with("acme.com as of 2026-06-01 (scoring abc123)"));
        assert!(rendered.contains("Company: Acme, Software"));
        assert!(!rendered.contains("Tech stack:"));
        assert!(rendered.contains("Top cloud services: Google Cloud\n"));
        assert!(rendered.contains("Employee scale"));
        assert!(rendered.contains("20.00/20"));
        assert!(rendered.contains("Functional coverage"));
        assert!(rendered.contains("5 days overdue"));
        assert!(rendered.contains("tech recency:     0.00 (unknown)"));
        assert!(rendered.contains("Final score:"));
        assert!(rendered.contains("Action:"));
    }
}
