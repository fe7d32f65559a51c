use crate::error::{PrioritizerError, Result};
use crate::report::joined_reasons;
use crate::types::report::BatchReport;
use crate::types::scoring::BatchRow;
use serde::Serialize;

#[derive(Serialize)]
struct CsvRow<'a> {
    rank: Option<usize>,
    domain: &'a str,
    final_score: Option<String>,
    trigger_badge: String,
    reasons: String,
    action: &'a str,
}

/// Columns: rank, domain, final_score, trigger_badge, reasons, action.
/// Rows without data leave rank and score empty.
pub fn to_csv(report: &BatchReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut rank = 0;

    for row in &report.rows {
        let record = match row {
            BatchRow::Scored(result) => {
                rank += 1;
                CsvRow {
                    rank: Some(rank),
                    domain: &result.domain,
                    final_score: Some(format!("{:.2}", result.final_score)),
                    trigger_badge: result.trigger_badge.to_string(),
                    reasons: joined_reasons(&result.reasons),
                    action: &result.action,
                }
            }
            BatchRow::NoData { domain, reason } => CsvRow {
                rank: None,
                domain,
                final_score: None,
                trigger_badge: "no data".to_string(),
                reasons: reason.clone(),
                action: "",
            },
        };
        writer.serialize(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| PrioritizerError::Io(err.into_error()))?;
    String::from_utf8(bytes).map_err(|err| PrioritizerError::Input(err.to_string()))
}
