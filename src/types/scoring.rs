use serde::{Deserialize, Serialize};
use std::fmt;

pub type Score = f64;

pub const FIT_SCORE_MAX: Score = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    EmployeeScale,
    ItSpend,
    CompanySpend,
    TechBreadth,
    TechIntensity,
    CloudSpend,
    FunctionalCoverage,
}

impl Factor {
    pub const ALL: [Factor; 7] = [
        Factor::EmployeeScale,
        Factor::ItSpend,
        Factor::CompanySpend,
        Factor::TechBreadth,
        Factor::TechIntensity,
        Factor::CloudSpend,
        Factor::FunctionalCoverage,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Factor::EmployeeScale => "Employee scale",
            Factor::ItSpend => "IT spend",
            Factor::CompanySpend => "Company spend",
            Factor::TechBreadth => "Tech breadth",
            Factor::TechIntensity => "Tech intensity",
            Factor::CloudSpend => "Cloud spend",
            Factor::FunctionalCoverage => "Functional coverage",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorContribution {
    pub factor: Factor,
    pub points: Score,
    pub cap: Score,
    /// Raw evidence behind the points, e.g. "12000 employees".
    pub evidence: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitResult {
    pub score: Score,
    pub contributions: Vec<FactorContribution>,
}

impl FitResult {
    #[cfg(test)]
    pub fn points_for(&self, factor: Factor) -> Score {
        self.contributions
            .iter()
            .find(|contribution| contribution.factor == factor)
            .map(|contribution| contribution.points)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badge {
    Hot,
    Warm,
    Cold,
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Badge::Hot => "Hot",
            Badge::Warm => "Warm",
            Badge::Cold => "Cold",
        };
        f.write_str(label)
    }
}

/// Which weighted timing component dominates the combined trigger value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerDriver {
    ContractRenewal,
    TechRecency,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerResult {
    pub badge: Badge,
    pub boost: Score,
    pub combined: f64,
    pub contract_score: f64,
    pub recency_score: f64,
    pub days_to_renewal: Option<i64>,
    pub days_since_verified: Option<i64>,
    pub driver: Option<TriggerDriver>,
}

/// Terminal per-domain output. Built once by the aggregator; the ranker only
/// reorders these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    pub domain: String,
    pub fit_score: Score,
    pub trigger_badge: Badge,
    pub trigger_boost: Score,
    pub final_score: Score,
    pub reasons: Vec<String>,
    pub action: String,
    /// Unscored context such as top cloud providers and spend areas.
    pub highlights: Vec<String>,
    pub contributions: Vec<FactorContribution>,
    pub trigger: TriggerResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchRow {
    Scored(ScoredResult),
    NoData { domain: String, reason: String },
}

impl BatchRow {
    pub fn domain(&self) -> &str {
        match self {
            BatchRow::Scored(result) => &result.domain,
            BatchRow::NoData { domain, .. } => domain,
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, BatchRow::Scored(_))
    }
}
