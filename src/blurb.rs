use crate::error::BlurbError;
use crate::types::report::{Blurb, BlurbFailure};
use crate::types::scoring::{BatchRow, ScoredResult};

/// Optional downstream consumer of scored results. It only reads
/// [`ScoredResult`]; its failures never reach scores or ranking.
pub trait BlurbGenerator {
    fn generate(&self, result: &ScoredResult) -> Result<String, BlurbError>;
}

/// Offline blurb built from the score explanation.
#[derive(Debug, Clone, Default)]
pub struct TemplateBlurbs;

impl BlurbGenerator for TemplateBlurbs {
    fn generate(&self, result: &ScoredResult) -> Result<String, BlurbError> {
        let evidence = result
            .reasons
            .iter()
            .take(2)
            .map(String::as_str)
            .collect::<Vec<_>>();
        if evidence.is_empty() {
            return Err(BlurbError::Generation {
                domain: result.domain.clone(),
                detail: "no scoring evidence to reference".to_string(),
            });
        }
        let mut text = format!(
            "{domain} scores {final_score:.1} (fit {fit:.1} + {badge} boost {boost:.0}). \
             Why now: {why}.",
            domain = result.domain,
            final_score = result.final_score,
            fit = result.fit_score,
            badge = result.trigger_badge,
            boost = result.trigger_boost,
            why = evidence.join("; "),
        );
        if !result.highlights.is_empty() {
            text.push_str(&format!(" Context: {}.", result.highlights.join("; ")));
        }
        text.push_str(&format!(" Next step: {}.", result.action));
        Ok(text)
    }
}

/// Runs the generator over the top `limit` scored rows.
pub fn generate_blurbs<G: BlurbGenerator + ?Sized>(
    rows: &[BatchRow],
    generator: &G,
    limit: usize,
) -> (Vec<Blurb>, Vec<BlurbFailure>) {
    let mut blurbs = Vec::new();
    let mut failures = Vec::new();

    let scored = rows.iter().filter_map(|row| match row {
        BatchRow::Scored(result) => Some(result),
        BatchRow::NoData { .. } => None,
    });
    for result in scored.take(limit) {
        match generator.generate(result) {
            Ok(text) => blurbs.push(Blurb {
                domain: result.domain.clone(),
                text,
            }),
            Err(err) => {
                tracing::warn!(domain = %result.domain, error = %err, "blurb generation failed");
                failures.push(BlurbFailure {
                    domain: result.domain.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    (blurbs, failures)
}
