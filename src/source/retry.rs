use super::SignalSource;
use crate::error::FetchError;
use crate::types::signals::SignalRecord;
use chrono::NaiveDate;
use std::time::Duration;

/// Retries transient fetch failures with a linearly growing pause.
pub struct RetryingSource<S> {
    inner: S,
    max_attempts: u32,
    backoff: Duration,
}

impl<S: SignalSource> RetryingSource<S> {
    pub fn new(inner: S, max_attempts: u32, backoff: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    #[cfg(test)]
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: SignalSource> SignalSource for RetryingSource<S> {
    fn fetch(&self, domain: &str, today: NaiveDate) -> Result<SignalRecord, FetchError> {
        let mut attempt = 1;
        loop {
            match self.inner.fetch(domain, today) {
                Ok(record) => return Ok(record),
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    let pause = self.backoff * attempt;
                    tracing::warn!(
                        domain,
                        attempt,
                        pause_ms = pause.as_millis() as u64,
                        error = %err,
                        "transient fetch failure, retrying"
                    );
                    std::thread::sleep(pause);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).expect("valid date")
    }

    #[test]
    fn retries_transient_failures_until_success() {
        let source = MemorySource::default()
            .with_failures("flaky.com", vec![FetchError::Timeout("flaky.com".to_string())])
            .with_record(SignalRecord::new("flaky.com"));
        let retrying = RetryingSource::new(source, 2, Duration::ZERO);

        let record = retrying.fetch("flaky.com", today()).expect("second attempt should succeed");
        assert_eq!(record.domain, "flaky.com");
        assert_eq!(retrying.inner().calls("flaky.com"), 2);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let failures = vec![
            FetchError::RateLimited("busy.com".to_string()),
            FetchError::RateLimited("busy.com".to_string()),
            FetchError::RateLimited("busy.com".to_string()),
        ];
        let source = MemorySource::default()
            .with_failures("busy.com", failures)
            .with_record(SignalRecord::new("busy.com"));
        let retrying = RetryingSource::new(source, 3, Duration::ZERO);

        let err = retrying.fetch("busy.com", today()).expect_err("all attempts should fail");
        assert_eq!(err, FetchError::RateLimited("busy.com".to_string()));
        assert_eq!(retrying.inner().calls("busy.com"), 3);
    }

    #[test]
    fn permanent_failures_are_not_retried() {
        let retrying = RetryingSource::new(MemorySource::default(), 5, Duration::ZERO);

        let err = retrying.fetch("ghost.com", today()).expect_err("missing domain should fail");
        assert_eq!(err, FetchError::NotFound("ghost.com".to_string()));
        assert_eq!(retrying.inner().calls("ghost.com"), 1);
    }
}
