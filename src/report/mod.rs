pub mod delimited;
pub mod explain;
pub mod json;
pub mod md;
pub mod table;

use crate::error::Result;
use crate::types::report::BatchReport;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Table,
    Md,
    Json,
    Csv,
}

pub fn render(report: &BatchReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(table::to_table(report)),
        OutputFormat::Md => Ok(md::to_markdown(report)),
        OutputFormat::Json => Ok(json::to_json(report)?),
        OutputFormat::Csv => delimited::to_csv(report),
    }
}

/// Reasons joined for single-cell renderers.
pub(crate) fn joined_reasons(reasons: &[String]) -> String {
    reasons.join("; ")
}
