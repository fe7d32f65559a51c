use crate::types::scoring::BatchRow;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Blurb {
    pub domain: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlurbFailure {
    pub domain: String,
    pub error: String,
}

/// Output of one batch run: ranked scored rows first, then rows without data.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub as_of: NaiveDate,
    pub scoring_version: String,
    pub cancelled: bool,
    pub rows: Vec<BatchRow>,
    pub blurbs: Vec<Blurb>,
    pub blurb_failures: Vec<BlurbFailure>,
}

impl BatchReport {
    pub fn scored_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_scored()).count()
    }

    pub fn no_data_count(&self) -> usize {
        self.rows.len() - self.scored_count()
    }
}
