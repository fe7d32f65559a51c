use crate::types::report::BatchReport;
use crate::types::scoring::BatchRow;

pub fn to_markdown(report: &BatchReport) -> String {
    let mut output = String::new();
    output.push_str("# Account Prioritization\n\n");
    output.push_str(&format!(
        "As of {} · scoring version `{}`\n\n",
        report.as_of, report.scoring_version
    ));
    if report.cancelled {
        output.push_str("> Batch cancelled before every domain was scored.\n\n");
    }

    output.push_str("## Ranking\n\n");
    output.push_str("| Rank | Domain | Final | Fit | Badge | Action |\n");
    output.push_str("|---:|---|---:|---:|---|---|\n");
    let mut rank = 0;
    for row in &report.rows {
        match row {
            BatchRow::Scored(result) => {
                rank += 1;
                output.push_str(&format!(
                    "| {} | {} | {:.2} | {:.2} | {} | {} |\n",
                    rank,
                    result.domain,
                    result.final_score,
                    result.fit_score,
                    result.trigger_badge,
                    result.action
                ));
            }
            BatchRow::NoData { domain, .. } => {
                output.push_str(&format!("| - | {domain} | - | - | no data | - |\n"));
            }
        }
    }
    output.push('\n');

    output.push_str("## Reasons\n\n");
    if report.rows.is_empty() {
        output.push_str("- none\n");
    }
    for row in &report.rows {
        match row {
            BatchRow::Scored(result) => {
                output.push_str(&format!("### {}\n\n", result.domain));
                for reason in &result.reasons {
                    output.push_str(&format!("- {reason}\n"));
                }
                for line in &result.highlights {
                    output.push_str(&format!("- _{line}_\n"));
                }
                output.push('\n');
            }
            BatchRow::NoData { domain, reason } => {
                output.push_str(&format!("### {domain}\n\n- no data: {reason}\n\n"));
            }
        }
    }

    if !report.blurbs.is_empty() || !report.blurb_failures.is_empty() {
        output.push_str("## Sales Blurbs\n\n");
        for blurb in &report.blurbs {
            output.push_str(&format!("- **{}**: {}\n", blurb.domain, blurb.text));
        }
        for failure in &report.blurb_failures {
            output.push_str(&format!(
                "- **{}**: blurb unavailable ({})\n",
                failure.domain, failure.error
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures;

    #[test]
    fn markdown_report_contains_sections() {
        let rendered = to_markdown(&fixtures::report());
        assert!(rendered.contains("# Account Prioritization"));
        assert!(rendered.contains("## Ranking"));
        assert!(rendered.contains("| 1 | hot.com |"));
        assert!(rendered.contains("| - | ghost.com | - | - | no data | - |"));
        assert!(rendered.contains("### cold.com"));
        assert!(rendered.contains("- _Top cloud services: Amazon Web Services_"));
        assert!(rendered.contains("## Sales Blurbs"));
        assert!(rendered.contains("blurb unavailable (generator offline)"));
    }

    #[test]
    fn markdown_omits_blurb_section_without_blurbs() {
        let mut report = fixtures::report();
        report.blurbs.clear();
        report.blurb_failures.clear();
        assert!(!to_markdown(&report).contains("## Sales Blurbs"));
    }
}
