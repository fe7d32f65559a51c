use crate::report::joined_reasons;
use crate::types::report::BatchReport;
use crate::types::scoring::BatchRow;

const HEADERS: [&str; 5] = ["#", "DOMAIN", "SCORE", "BADGE", "ACTION"];

/// Plain-text ranking for terminals. Reasons go on an indented line below
/// each row so the columns stay narrow.
pub fn to_table(report: &BatchReport) -> String {
    let mut cells: Vec<[String; 5]> = Vec::new();
    let mut details: Vec<String> = Vec::new();
    let mut rank = 0;

    for row in &report.rows {
        match row {
            BatchRow::Scored(result) => {
                rank += 1;
                cells.push([
                    rank.to_string(),
                    result.domain.clone(),
                    format!("{:.2}", result.final_score),
                    result.trigger_badge.to_string(),
                    result.action.clone(),
                ]);
                details.push(joined_reasons(&result.reasons));
            }
            BatchRow::NoData { domain, reason } => {
                cells.push([
                    "-".to_string(),
                    domain.clone(),
                    "-".to_string(),
                    "no data".to_string(),
                    "-".to_string(),
                ]);
                details.push(reason.clone());
            }
        }
    }

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = format!(
        "Account ranking as of {} (scoring {})\n",
        report.as_of, report.scoring_version
    );
    output.push_str(&format_line(&HEADERS.map(str::to_string), &widths));
    for (row, detail) in cells.iter().zip(details.iter()) {
        output.push_str(&format_line(row, &widths));
        output.push_str(&format!("    {detail}\n"));
    }
    if report.rows.is_empty() {
        output.push_str("no domains to rank\n");
    }
    if report.cancelled {
        output.push_str("batch cancelled: remaining domains were not scored\n");
    }
    output
}

fn format_line(cells: &[String; 5], widths: &[usize; 5]) -> String {
    let padded = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>();
    format!("{}\n", padded.join("  ").trim_end())
}
