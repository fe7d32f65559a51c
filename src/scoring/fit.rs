use crate::types::config::FitPolicy;
use crate::types::scoring::{Factor, FactorContribution, FitResult, Score, FIT_SCORE_MAX};
use crate::types::signals::SignalRecord;
use std::collections::BTreeSet;

/// Firmographic/technographic fit in `[0, 100]`.
///
/// Each factor is clamped to its cap before the sum, and the sum is clamped
/// again. Unknown inputs contribute zero; this function never fails.
pub fn compute_fit_score(record: &SignalRecord, policy: &FitPolicy) -> FitResult {
    let caps = &policy.caps;
    let references = &policy.references;

    let employees = positive(record.employee_count.map(|count| count as f64));
    let it_spend = positive(record.it_spend);
    let company_spend = positive(record.company_spend);
    let cloud_spend = positive(record.cloud_monthly_spend);
    let breadth = record.tech_installs.len() as f64;
    let intensity = average_intensity(record, references.tech_intensity);
    let areas = matched_areas(&record.company_fai, &policy.keywords);

    let contributions = vec![
        contribution(
            Factor::EmployeeScale,
            log_points(employees, references.employee_scale, caps.employee_scale),
            caps.employee_scale,
            employees.map(|count| format!("{count:.0} employees")),
        ),
        contribution(
            Factor::ItSpend,
            log_points(it_spend, references.it_spend, caps.it_spend),
            caps.it_spend,
            it_spend.map(|spend| format!("{} IT spend", money(spend))),
        ),
        contribution(
            Factor::CompanySpend,
            log_points(company_spend, references.company_spend, caps.company_spend),
            caps.company_spend,
            company_spend.map(|spend| format!("{}/yr company spend", money(spend))),
        ),
        contribution(
            Factor::TechBreadth,
            linear_points(positive(Some(breadth)), references.tech_breadth, caps.tech_breadth),
            caps.tech_breadth,
            (breadth > 0.0).then(|| format!("{breadth:.0} technologies installed")),
        ),
        contribution(
            Factor::TechIntensity,
            linear_points(intensity, references.tech_intensity, caps.tech_intensity),
            caps.tech_intensity,
            intensity.map(|avg| format!("avg intensity {avg:.0}")),
        ),
        contribution(
            Factor::CloudSpend,
            log_points(cloud_spend, references.cloud_spend, caps.cloud_spend),
            caps.cloud_spend,
            cloud_spend.map(|spend| format!("{}/mo cloud spend", money(spend))),
        ),
        contribution(
            Factor::FunctionalCoverage,
            areas.len() as f64 * policy.points_per_area,
            caps.functional_coverage,
            (!areas.is_empty()).then(|| format!("active in {}", areas.join(", "))),
        ),
    ];

    let total: Score = contributions.iter().map(|c| c.points).sum();
    FitResult {
        score: round2(total.clamp(0.0, FIT_SCORE_MAX)),
        contributions,
    }
}

/// Functional areas that contain any keyword, compared case-insensitively.
pub fn matched_areas<'a>(areas: &'a BTreeSet<String>, keywords: &[String]) -> Vec<&'a str> {
    let keywords = keywords
        .iter()
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect::<Vec<_>>();

    areas
        .iter()
        .filter(|area| {
            let lowered = area.to_lowercase();
            keywords.iter().any(|keyword| lowered.contains(keyword.as_str()))
        })
        .map(String::as_str)
        .collect()
}

fn contribution(
    factor: Factor,
    raw_points: Score,
    cap: Score,
    evidence: Option<String>,
) -> FactorContribution {
    FactorContribution {
        factor,
        points: round2(clamp_points(raw_points, cap)),
        cap,
        evidence,
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn clamp_points(points: Score, cap: Score) -> Score {
    if !points.is_finite() {
        return 0.0;
    }
    points.clamp(0.0, cap.max(0.0))
}

fn log_points(value: Option<f64>, reference: f64, cap: Score) -> Score {
    match value {
        Some(v) => cap * v.ln_1p() / reference.ln_1p(),
        None => 0.0,
    }
}

fn linear_points(value: Option<f64>, reference: f64, cap: Score) -> Score {
    match value {
        Some(v) => cap * v / reference,
        None => 0.0,
    }
}

fn average_intensity(record: &SignalRecord, upper: f64) -> Option<f64> {
    let values = record
        .tech_installs
        .iter()
        .filter_map(|install| install.intensity)
        .filter(|intensity| intensity.is_finite())
        .map(|intensity| intensity.clamp(0.0, upper.max(0.0)))
        .collect::<Vec<_>>();
    if values.is_empty() {
        return None;
    }
    positive(Some(values.iter().sum::<f64>() / values.len() as f64))
}

fn money(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("${:.1}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.0}K", value / 1_000.0)
    } else {
        format!("${value:.0}")
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
