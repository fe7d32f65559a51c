use crate::types::scoring::ScoredResult;
use std::cmp::Ordering;

/// Orders by `final_score` descending, then by domain ascending.
pub fn rank(mut results: Vec<ScoredResult>) -> Vec<ScoredResult> {
    results.sort_by(compare);
    results
}

fn compare(a: &ScoredResult, b: &ScoredResult) -> Ordering {
    b.final_score
        .total_cmp(&a.final_score)
        .then_with(|| a.domain.cmp(&b.domain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::scoring::{Badge, TriggerResult};

    fn result(domain: &str, final_score: f64) -> ScoredResult {
        ScoredResult {
            domain: domain.to_string(),
            fit_score: final_score,
            trigger_badge: Badge::Cold,
            trigger_boost: 0.0,
            final_score,
            reasons: Vec::new(),
            action: "monitor".to_string(),
            highlights: Vec::new(),
            contributions: Vec::new(),
            trigger: TriggerResult {
                badge: Badge::Cold,
                boost: 0.0,
                combined: 0.0,
                contract_score: 0.0,
                recency_score: 0.0,
                days_to_renewal: None,
                days_since_verified: None,
                driver: None,
            },
        }
    }

    fn domains(results: &[ScoredResult]) -> Vec<&str> {
        results.iter().map(|result| result.domain.as_str()).collect()
    }

    #[test]
    fn ranks_by_final_score_descending() {
        let ranked = rank(vec![
            result("low.com", 12.0),
            result("high.com", 88.5),
            result("mid.com", 57.0),
        ]);
        assert_eq!(domains(&ranked), vec!["high.com", "mid.com", "low.com"]);
    }

    #[test]
    fn ties_break_by_domain_name() {
        let ranked = rank(vec![
            result("zeta.io", 40.0),
            result("alpha.io", 40.0),
            result("beta.io", 40.0),
        ]);
        assert_eq!(domains(&ranked), vec!["alpha.io", "beta.io", "zeta.io"]);
    }

    #[test]
    fn ranking_is_deterministic_across_input_orders() {
        let forward = vec![
            result("b.com", 30.0),
            result("a.com", 30.0),
            result("c.com", 72.0),
            result("d.com", 5.0),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let first = rank(forward);
        let second = rank(backward);
        assert_eq!(first, second);
        assert_eq!(rank(first.clone()), first);
        assert_eq!(domains(&first), vec!["c.com", "a.com", "b.com", "d.com"]);
    }

    #[test]
    fn duplicate_domains_are_kept() {
        let ranked = rank(vec![result("dup.com", 10.0), result("dup.com", 20.0)]);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].final_score, 20.0);
    }
}
