use crate::types::config::{DecayStep, PastRenewalPolicy, TriggerPolicy};
use crate::types::scoring::{Badge, TriggerDriver, TriggerResult};
use crate::types::signals::SignalRecord;
use chrono::NaiveDate;

/// Timing urgency from contract renewal proximity and tech verification
/// recency. Pure given `now`; missing dates score zero.
pub fn compute_trigger(record: &SignalRecord, now: NaiveDate, policy: &TriggerPolicy) -> TriggerResult {
    let days_to_renewal = record
        .contract_renewal_date
        .map(|renewal| (renewal - now).num_days());
    let days_since_verified = record
        .tech_verified_date
        .map(|verified| (now - verified).num_days());

    let contract_score = contract_score(days_to_renewal, policy);
    let recency_score = recency_score(days_since_verified, policy);
    let contract_part = policy.contract_weight * contract_score;
    let recency_part = policy.recency_weight * recency_score;
    let combined = contract_part + recency_part;
    let badge = classify(combined, policy);
    let driver = if combined <= 0.0 {
        None
    } else if contract_part >= recency_part {
        Some(TriggerDriver::ContractRenewal)
    } else {
        Some(TriggerDriver::TechRecency)
    };

    TriggerResult {
        badge,
        boost: policy.boosts.for_badge(badge),
        combined,
        contract_score,
        recency_score,
        days_to_renewal,
        days_since_verified,
        driver,
    }
}

pub fn contract_score(days_to_renewal: Option<i64>, policy: &TriggerPolicy) -> f64 {
    match days_to_renewal {
        None => 0.0,
        Some(days) if days < 0 => match policy.past_renewal {
            PastRenewalPolicy::Due => step_score(0, &policy.contract_steps),
            PastRenewalPolicy::Ignore => 0.0,
        },
        Some(days) => step_score(days, &policy.contract_steps),
    }
}

pub fn recency_score(days_since_verified: Option<i64>, policy: &TriggerPolicy) -> f64 {
    match days_since_verified {
        None => 0.0,
        // a verification date after `now` counts as today
        Some(days) => step_score(days.max(0), &policy.recency_steps),
    }
}

pub fn classify(combined: f64, policy: &TriggerPolicy) -> Badge {
    if combined >= policy.hot_threshold {
        Badge::Hot
    } else if combined >= policy.warm_threshold {
        Badge::Warm
    } else {
        Badge::Cold
    }
}

fn step_score(days: i64, steps: &[DecayStep]) -> f64 {
    steps
        .iter()
        .find(|step| days <= step.max_days)
        .map(|step| step.score)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date")
    }

    fn record_with(renewal_in: Option<i64>, verified_ago: Option<i64>) -> SignalRecord {
        let mut record = SignalRecord::new("timing.com");
        record.contract_renewal_date = renewal_in.map(|days| now() + Duration::days(days));
        record.tech_verified_date = verified_ago.map(|days| now() - Duration::days(days));
        record
    }

    #[test]
    fn contract_score_follows_step_tiers() {
        let policy = TriggerPolicy::default();
        let expected = [(10, 1.0), (60, 0.8), (150, 0.5), (300, 0.2), (500, 0.0)];
        for (days, score) in expected {
            assert_eq!(contract_score(Some(days), &policy), score, "days = {days}");
        }
    }

    #[test]
    fn contract_steps_include_their_upper_bound() {
        let policy = TriggerPolicy::default();
        assert_eq!(contract_score(Some(30), &policy), 1.0);
        assert_eq!(contract_score(Some(31), &policy), 0.8);
        assert_eq!(contract_score(Some(365), &policy), 0.2);
        assert_eq!(contract_score(Some(366), &policy), 0.0);
    }

    #[test]
    fn contract_score_is_non_increasing() {
        let policy = TriggerPolicy::default();
        let scores = (0..=400)
            .map(|days| contract_score(Some(days), &policy))
            .collect::<Vec<_>>();
        assert!(scores.windows(2).all(|pair| pair[1] <= pair[0]));
    }

    #[test]
    fn recency_score_follows_step_tiers() {
        let policy = TriggerPolicy::default();
        let expected = [(0, 1.0), (30, 1.0), (31, 0.6), (120, 0.6), (200, 0.2), (366, 0.0)];
        for (days, score) in expected {
            assert_eq!(recency_score(Some(days), &policy), score, "days = {days}");
        }
    }

    #[test]
    fn missing_dates_score_zero_and_cold() {
        let result = compute_trigger(&record_with(None, None), now(), &TriggerPolicy::default());
        assert_eq!(result.contract_score, 0.0);
        assert_eq!(result.recency_score, 0.0);
        assert_eq!(result.combined, 0.0);
        assert_eq!(result.badge, Badge::Cold);
        assert_eq!(result.boost, 0.0);
        assert_eq!(result.days_to_renewal, None);
        assert_eq!(result.driver, None);
    }

    #[test]
    fn imminent_renewal_with_recent_verification_is_hot() {
        let result = compute_trigger(
            &record_with(Some(10), Some(60)),
            now(),
            &TriggerPolicy::default(),
        );
        assert_eq!(result.contract_score, 1.0);
        assert_eq!(result.recency_score, 0.6);
        assert!((result.combined - 0.84).abs() < 1e-9);
        assert_eq!(result.badge, Badge::Hot);
        assert_eq!(result.boost, 15.0);
        assert_eq!(result.days_to_renewal, Some(10));
        assert_eq!(result.days_since_verified, Some(60));
        assert_eq!(result.driver, Some(TriggerDriver::ContractRenewal));
    }

    #[test]
    fn fresh_verification_without_contract_is_driven_by_recency() {
        // 0.4 * 1.0 = 0.40, exactly the warm threshold
        let result = compute_trigger(&record_with(None, Some(3)), now(), &TriggerPolicy::default());
        assert_eq!(result.badge, Badge::Warm);
        assert_eq!(result.driver, Some(TriggerDriver::TechRecency));
    }

    #[test]
    fn mid_range_signals_are_warm() {
        // 0.6 * 0.5 + 0.4 * 0.6 = 0.54
        let result = compute_trigger(
            &record_with(Some(150), Some(90)),
            now(),
            &TriggerPolicy::default(),
        );
        assert_eq!(result.badge, Badge::Warm);
        assert_eq!(result.boost, 7.0);
    }

    #[test]
    fn badge_thresholds_are_inclusive() {
        let policy = TriggerPolicy::default();
        assert_eq!(classify(0.75, &policy), Badge::Hot);
        assert_eq!(classify(0.7499, &policy), Badge::Warm);
        assert_eq!(classify(0.40, &policy), Badge::Warm);
        assert_eq!(classify(0.3999, &policy), Badge::Cold);
    }

    #[test]
    fn past_renewal_follows_policy() {
        let record = record_with(Some(-20), None);

        let due = compute_trigger(&record, now(), &TriggerPolicy::default());
        assert_eq!(due.contract_score, 1.0);
        assert_eq!(due.days_to_renewal, Some(-20));

        let policy = TriggerPolicy {
            past_renewal: PastRenewalPolicy::Ignore,
            ..TriggerPolicy::default()
        };
        let ignored = compute_trigger(&record, now(), &policy);
        assert_eq!(ignored.contract_score, 0.0);
    }

    #[test]
    fn future_verification_counts_as_fresh() {
        let result = compute_trigger(
            &record_with(None, Some(-5)),
            now(),
            &TriggerPolicy::default(),
        );
        assert_eq!(result.recency_score, 1.0);
        assert_eq!(result.days_since_verified, Some(-5));
    }

    #[test]
    fn custom_boosts_are_applied() {
        let mut policy = TriggerPolicy::default();
        policy.boosts.warm = 9.0;
        let result = compute_trigger(&record_with(Some(150), Some(90)), now(), &policy);
        assert_eq!(result.boost, 9.0);
    }
}
