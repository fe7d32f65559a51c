use crate::types::config::AggregatePolicy;
use crate::types::scoring::{
    FactorContribution, FitResult, ScoredResult, TriggerDriver, TriggerResult, FIT_SCORE_MAX,
};
use std::cmp::Ordering;

pub fn aggregate(
    domain: &str,
    fit: &FitResult,
    trigger: &TriggerResult,
    policy: &AggregatePolicy,
) -> ScoredResult {
    let mut final_score = fit.score + trigger.boost;
    if policy.clamp_final_score {
        final_score = final_score.min(FIT_SCORE_MAX);
    }

    let mut reasons = top_factors(&fit.contributions, policy.reason_factors)
        .into_iter()
        .map(factor_reason)
        .collect::<Vec<_>>();
    reasons.push(trigger_reason(trigger));

    ScoredResult {
        domain: domain.to_string(),
        fit_score: fit.score,
        trigger_badge: trigger.badge,
        trigger_boost: trigger.boost,
        final_score,
        reasons,
        action: policy.actions.for_badge(trigger.badge).to_string(),
        highlights: Vec::new(),
        contributions: fit.contributions.clone(),
        trigger: trigger.clone(),
    }
}

/// Largest positive contributions first; equal points keep factor order.
fn top_factors(contributions: &[FactorContribution], limit: usize) -> Vec<&FactorContribution> {
    let mut ranked = contributions
        .iter()
        .filter(|contribution| contribution.points > 0.0)
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.points.partial_cmp(&a.points).unwrap_or(Ordering::Equal));
    ranked.truncate(limit);
    ranked
}

fn factor_reason(contribution: &FactorContribution) -> String {
    let points = format!(
        "{}: {:.1}/{:.0} pts",
        contribution.factor.label(),
        contribution.points,
        contribution.cap
    );
    match &contribution.evidence {
        Some(evidence) => format!("{points} ({evidence})"),
        None => points,
    }
}

fn trigger_reason(trigger: &TriggerResult) -> String {
    let head = format!("Trigger {:.2} ({})", trigger.combined, trigger.badge);
    match trigger.driver {
        Some(TriggerDriver::ContractRenewal) => match trigger.days_to_renewal {
            Some(days) if days < 0 => {
                format!("{head}, driven by a contract renewal {} days overdue", -days)
            }
            Some(days) => format!("{head}, driven by contract renewal in {days} days"),
            None => format!("{head}, driven by contract renewal"),
        },
        Some(TriggerDriver::TechRecency) => match trigger.days_since_verified {
            Some(days) => format!(
                "{head}, driven by tech stack verified {} days ago",
                days.max(0)
            ),
            None => format!("{head}, driven by tech verification recency"),
        },
        None => format!("{head}: no timing signal"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::scoring::{Badge, Factor};

    fn contribution(factor: Factor, points: f64, cap: f64) -> FactorContribution {
        FactorContribution {
            factor,
            points,
            cap,
            evidence: None,
        }
    }

    fn fit(score: f64) -> FitResult {
        FitResult {
            score,
            contributions: vec![
                contribution(Factor::EmployeeScale, 18.0, 20.0),
                contribution(Factor::ItSpend, 0.0, 15.0),
                contribution(Factor::TechBreadth, 12.0, 15.0),
                contribution(Factor::CloudSpend, 10.0, 10.0),
                contribution(Factor::FunctionalCoverage, 10.0, 10.0),
            ],
        }
    }

    fn trigger(badge: Badge, boost: f64, combined: f64, driver: Option<TriggerDriver>) -> TriggerResult {
        TriggerResult {
            badge,
            boost,
            combined,
            contract_score: 0.5,
            recency_score: 0.6,
            days_to_renewal: Some(120),
            days_since_verified: Some(45),
            driver,
        }
    }

    #[test]
    fn final_score_adds_boost_exactly() {
        let result = aggregate(
            "acme.com",
            &fit(50.0),
            &trigger(Badge::Warm, 7.0, 0.54, Some(TriggerDriver::ContractRenewal)),
            &AggregatePolicy::default(),
        );
        assert_eq!(result.fit_score, 50.0);
        assert_eq!(result.trigger_boost, 7.0);
        assert_eq!(result.final_score, 57.0);
        assert_eq!(result.trigger_badge, Badge::Warm);
    }

    #[test]
    fn final_score_is_not_clamped_by_default() {
        let result = aggregate(
            "big.com",
            &fit(95.0),
            &trigger(Badge::Hot, 15.0, 0.9, Some(TriggerDriver::ContractRenewal)),
            &AggregatePolicy::default(),
        );
        assert_eq!(result.final_score, 110.0);
    }

    #[test]
    fn final_score_clamp_is_a_policy_flag() {
        let policy = AggregatePolicy {
            clamp_final_score: true,
            ..AggregatePolicy::default()
        };
        let result = aggregate(
            "big.com",
            &fit(95.0),
            &trigger(Badge::Hot, 15.0, 0.9, Some(TriggerDriver::ContractRenewal)),
            &policy,
        );
        assert_eq!(result.final_score, 100.0);
        assert_eq!(result.fit_score, 95.0);
    }

    #[test]
    fn reasons_list_top_factors_then_trigger() {
        let result = aggregate(
            "acme.com",
            &fit(50.0),
            &trigger(Badge::Warm, 7.0, 0.54, Some(TriggerDriver::ContractRenewal)),
            &AggregatePolicy::default(),
        );
        assert_eq!(
            result.reasons,
            vec![
                "Employee scale: 18.0/20 pts".to_string(),
                "Tech breadth: 12.0/15 pts".to_string(),
                "Trigger 0.54 (Warm), driven by contract renewal in 120 days".to_string(),
            ]
        );
    }

    #[test]
    fn equal_points_keep_factor_order() {
        let policy = AggregatePolicy {
            reason_factors: 4,
            ..AggregatePolicy::default()
        };
        let result = aggregate(
            "acme.com",
            &fit(50.0),
            &trigger(Badge::Cold, 0.0, 0.2, Some(TriggerDriver::TechRecency)),
            &policy,
        );
        assert!(result.reasons[2].starts_with("Cloud spend"));
        assert!(result.reasons[3].starts_with("Functional coverage"));
        assert_eq!(
            result.reasons[4],
            "Trigger 0.20 (Cold), driven by tech stack verified 45 days ago"
        );
    }

    #[test]
    fn reasons_include_evidence_when_known() {
        let mut fit = fit(30.0);
        fit.contributions[0].evidence = Some("12000 employees".to_string());
        let result = aggregate(
            "acme.com",
            &fit,
            &trigger(Badge::Cold, 0.0, 0.0, None),
            &AggregatePolicy::default(),
        );
        assert_eq!(result.reasons[0], "Employee scale: 18.0/20 pts (12000 employees)");
        assert_eq!(result.reasons[2], "Trigger 0.00 (Cold): no timing signal");
    }

    #[test]
    fn empty_fit_yields_only_trigger_reason() {
        let empty = FitResult {
            score: 0.0,
            contributions: vec![contribution(Factor::EmployeeScale, 0.0, 20.0)],
        };
        let result = aggregate(
            "none.com",
            &empty,
            &trigger(Badge::Cold, 0.0, 0.0, None),
            &AggregatePolicy::default(),
        );
        assert_eq!(result.reasons.len(), 1);
    }

    #[test]
    fn action_follows_badge() {
        let policy = AggregatePolicy::default();
        for badge in [Badge::Hot, Badge::Warm, Badge::Cold] {
            let result = aggregate(
                "acme.com",
                &fit(40.0),
                &trigger(badge, 0.0, 0.5, Some(TriggerDriver::ContractRenewal)),
                &policy,
            );
            assert_eq!(result.action, policy.actions.for_badge(badge));
        }
        assert!(policy.actions.hot.contains("urgent outreach"));
        assert!(policy.actions.warm.contains("follow-up"));
        assert!(policy.actions.cold.contains("monitor"));
    }

    #[test]
    fn overdue_renewal_is_described_as_overdue() {
        let mut overdue = trigger(Badge::Hot, 15.0, 0.84, Some(TriggerDriver::ContractRenewal));
        overdue.days_to_renewal = Some(-12);
        let result = aggregate("late.com", &fit(10.0), &overdue, &AggregatePolicy::default());
        assert!(result
            .reasons
            .last()
            .is_some_and(|reason| reason.ends_with("contract renewal 12 days overdue")));
    }
}
