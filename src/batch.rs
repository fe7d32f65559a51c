use crate::scoring::{rank::rank, score_record};
use crate::source::SignalSource;
use crate::types::config::ScoringPolicy;
use crate::types::scoring::BatchRow;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop request, checked between domains.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Raises the flag on Ctrl-C / SIGINT. The first interrupt stops the batch
    /// after the domain in flight; completed rows are still reported.
    pub fn cancel_on_interrupt(&self) -> Result<(), ctrlc::Error> {
        let flag = self.clone();
        ctrlc::set_handler(move || {
            tracing::warn!("interrupt received, finishing the current domain");
            flag.cancel();
        })
    }
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub rows: Vec<BatchRow>,
    pub cancelled: bool,
}

/// Fetches and scores every domain, then ranks the scored rows. Rows without
/// data follow the ranked rows, sorted by domain.
pub fn run_batch<S: SignalSource + ?Sized>(
    domains: &[String],
    source: &S,
    today: NaiveDate,
    policy: &ScoringPolicy,
    cancel: &CancelFlag,
) -> BatchOutcome {
    tracing::info!(domains = domains.len(), %today, "scoring batch");

    let mut scored = Vec::new();
    let mut missing = Vec::new();
    let mut cancelled = false;

    for domain in domains {
        if cancel.is_cancelled() {
            tracing::warn!(
                completed = scored.len() + missing.len(),
                remaining = domains.len() - scored.len() - missing.len(),
                "batch cancelled"
            );
            cancelled = true;
            break;
        }

        match source.fetch(domain, today) {
            Ok(record) => {
                let result = score_record(&record, today, policy);
                tracing::debug!(
                    domain = %result.domain,
                    fit = result.fit_score,
                    badge = %result.trigger_badge,
                    final_score = result.final_score,
                    "scored domain"
                );
                scored.push(result);
            }
            Err(err) => {
                tracing::warn!(domain = %domain, error = %err, "no signal data");
                missing.push(BatchRow::NoData {
                    domain: domain.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    missing.sort_by(|a, b| a.domain().cmp(b.domain()));
    let mut rows = rank(scored)
        .into_iter()
        .map(BatchRow::Scored)
        .collect::<Vec<_>>();
    rows.extend(missing);

    BatchOutcome { rows, cancelled }
}

/// One domain per line; blank lines and `#` comments are skipped.
pub fn parse_domains(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .filter_map(normalize_domain)
        .collect()
}

/// Lowercases and strips a URL scheme, `www.` prefix and trailing path.
pub fn normalize_domain(raw: &str) -> Option<String> {
    let trimmed = raw.trim().to_lowercase();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(&trimmed);
    let host = without_scheme.split('/').next().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    (!host.is_empty()).then(|| host.to_string())
}
