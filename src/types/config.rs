use crate::error::PrioritizerError;
use crate::types::scoring::{Badge, Factor, Score};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrioritizerConfig {
    #[serde(flatten)]
    pub scoring: ScoringPolicy,
    pub source: SourceConfig,
}

/// Everything the calculators read. Passed explicitly; nothing is global.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub fit: FitPolicy,
    pub trigger: TriggerPolicy,
    pub aggregate: AggregatePolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitPolicy {
    pub caps: FactorCaps,
    pub references: ReferenceScales,
    pub keywords: Vec<String>,
    pub points_per_area: Score,
}

impl Default for FitPolicy {
    fn default() -> Self {
        Self {
            caps: FactorCaps::default(),
            references: ReferenceScales::default(),
            keywords: [
                "IT",
                "Engineering",
                "Data",
                "Security",
                "Cloud",
                "AI",
                "Machine Learning",
                "ML",
            ]
            .iter()
            .map(|keyword| keyword.to_string())
            .collect(),
            points_per_area: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorCaps {
    pub employee_scale: Score,
    pub it_spend: Score,
    pub company_spend: Score,
    pub tech_breadth: Score,
    pub tech_intensity: Score,
    pub cloud_spend: Score,
    pub functional_coverage: Score,
}

impl Default for FactorCaps {
    fn default() -> Self {
        Self {
            employee_scale: 20.0,
            it_spend: 15.0,
            company_spend: 15.0,
            tech_breadth: 15.0,
            tech_intensity: 15.0,
            cloud_spend: 10.0,
            functional_coverage: 10.0,
        }
    }
}

impl FactorCaps {
    pub fn cap(&self, factor: Factor) -> Score {
        match factor {
            Factor::EmployeeScale => self.employee_scale,
            Factor::ItSpend => self.it_spend,
            Factor::CompanySpend => self.company_spend,
            Factor::TechBreadth => self.tech_breadth,
            Factor::TechIntensity => self.tech_intensity,
            Factor::CloudSpend => self.cloud_spend,
            Factor::FunctionalCoverage => self.functional_coverage,
        }
    }
}

/// Raw value at which a factor reaches its cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceScales {
    pub employee_scale: f64,
    pub it_spend: f64,
    pub company_spend: f64,
    pub tech_breadth: f64,
    pub tech_intensity: f64,
    pub cloud_spend: f64,
}

impl Default for ReferenceScales {
    fn default() -> Self {
        Self {
            employee_scale: 100_000.0,
            it_spend: 1_000_000_000.0,
            company_spend: 1_000_000_000.0,
            tech_breadth: 50.0,
            tech_intensity: 2_000.0,
            cloud_spend: 10_000_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayStep {
    pub max_days: i64,
    pub score: f64,
}

impl DecayStep {
    const fn new(max_days: i64, score: f64) -> Self {
        Self { max_days, score }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PastRenewalPolicy {
    /// A lapsed renewal date counts as already due (tightest bucket).
    Due,
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerPolicy {
    pub contract_steps: Vec<DecayStep>,
    pub recency_steps: Vec<DecayStep>,
    pub contract_weight: f64,
    pub recency_weight: f64,
    pub hot_threshold: f64,
    pub warm_threshold: f64,
    pub past_renewal: PastRenewalPolicy,
    pub boosts: BadgeBoosts,
}

impl Default for TriggerPolicy {
    fn default() -> Self {
        Self {
            contract_steps: vec![
                DecayStep::new(30, 1.0),
                DecayStep::new(90, 0.8),
                DecayStep::new(180, 0.5),
                DecayStep::new(365, 0.2),
            ],
            recency_steps: vec![
                DecayStep::new(30, 1.0),
                DecayStep::new(120, 0.6),
                DecayStep::new(365, 0.2),
            ],
            contract_weight: 0.6,
            recency_weight: 0.4,
            hot_threshold: 0.75,
            warm_threshold: 0.40,
            past_renewal: PastRenewalPolicy::Due,
            boosts: BadgeBoosts::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeBoosts {
    pub hot: Score,
    pub warm: Score,
    pub cold: Score,
}

impl Default for BadgeBoosts {
    fn default() -> Self {
        Self {
            hot: 15.0,
            warm: 7.0,
            cold: 0.0,
        }
    }
}

impl BadgeBoosts {
    pub fn for_badge(&self, badge: Badge) -> Score {
        match badge {
            Badge::Hot => self.hot,
            Badge::Warm => self.warm,
            Badge::Cold => self.cold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatePolicy {
    pub reason_factors: usize,
    /// Cap final_score at 100 after the trigger boost is added.
    pub clamp_final_score: bool,
    pub actions: BadgeActions,
}

impl Default for AggregatePolicy {
    fn default() -> Self {
        Self {
            reason_factors: 2,
            clamp_final_score: false,
            actions: BadgeActions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeActions {
    pub hot: String,
    pub warm: String,
    pub cold: String,
}

impl Default for BadgeActions {
    fn default() -> Self {
        Self {
            hot: "Reach out now: urgent outreach while the buying window is open".to_string(),
            warm: "Schedule a follow-up and prepare the account plan".to_string(),
            cold: "Nurture and monitor signals for a change".to_string(),
        }
    }
}

impl BadgeActions {
    pub fn for_badge(&self, badge: Badge) -> &str {
        match badge {
            Badge::Hot => &self.hot,
            Badge::Warm => &self.warm,
            Badge::Cold => &self.cold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signals_dir: Option<PathBuf>,
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            signals_dir: None,
            max_attempts: 2,
            backoff_ms: 500,
        }
    }
}

impl PrioritizerConfig {
    pub fn validate(&self) -> Result<(), PrioritizerError> {
        self.scoring.validate()?;
        if self.source.max_attempts == 0 {
            return Err(invalid("source.max_attempts must be greater than 0"));
        }
        Ok(())
    }
}

impl ScoringPolicy {
    pub fn validate(&self) -> Result<(), PrioritizerError> {
        validate_fit(&self.fit)?;
        validate_trigger(&self.trigger)?;
        validate_aggregate(&self.aggregate)
    }

    /// Short content hash of the resolved policy, used as the scoring version.
    pub fn fingerprint(&self) -> Result<String, PrioritizerError> {
        let bytes = serde_json::to_vec(self)?;
        let digest = format!("{:x}", Sha256::digest(&bytes));
        Ok(digest[..16].to_string())
    }
}

fn invalid(message: impl Into<String>) -> PrioritizerError {
    PrioritizerError::InvalidConfig(message.into())
}

fn validate_fit(fit: &FitPolicy) -> Result<(), PrioritizerError> {
    for factor in Factor::ALL {
        let cap = fit.caps.cap(factor);
        if !cap.is_finite() || cap < 0.0 {
            return Err(invalid(format!(
                "fit.caps for {} must be a non-negative number (found {cap})",
                factor.label()
            )));
        }
    }

    let references = &fit.references;
    for (name, value) in [
        ("employee_scale", references.employee_scale),
        ("it_spend", references.it_spend),
        ("company_spend", references.company_spend),
        ("tech_breadth", references.tech_breadth),
        ("tech_intensity", references.tech_intensity),
        ("cloud_spend", references.cloud_spend),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid(format!(
                "fit.references.{name} must be greater than 0 (found {value})"
            )));
        }
    }

    if !fit.points_per_area.is_finite() || fit.points_per_area < 0.0 {
        return Err(invalid("fit.points_per_area must be a non-negative number"));
    }

    let mut seen = HashSet::new();
    for keyword in &fit.keywords {
        let normalized = keyword.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(invalid("fit.keywords entries must be non-empty"));
        }
        if !seen.insert(normalized) {
            return Err(invalid(format!(
                "fit.keywords contains duplicate keyword: {}",
                keyword.trim()
            )));
        }
    }

    Ok(())
}

fn validate_steps(name: &str, steps: &[DecayStep]) -> Result<(), PrioritizerError> {
    if steps.is_empty() {
        return Err(invalid(format!("trigger.{name} must contain at least one step")));
    }
    for step in steps {
        if step.max_days < 0 {
            return Err(invalid(format!(
                "trigger.{name} max_days must be non-negative (found {})",
                step.max_days
            )));
        }
        if !(0.0..=1.0).contains(&step.score) {
            return Err(invalid(format!(
                "trigger.{name} scores must be between 0.0 and 1.0 (found {})",
                step.score
            )));
        }
    }
    for pair in steps.windows(2) {
        if pair[1].max_days <= pair[0].max_days {
            return Err(invalid(format!(
                "trigger.{name} max_days must be strictly increasing"
            )));
        }
        if pair[1].score > pair[0].score {
            return Err(invalid(format!(
                "trigger.{name} scores must not increase with days"
            )));
        }
    }
    Ok(())
}

fn validate_trigger(trigger: &TriggerPolicy) -> Result<(), PrioritizerError> {
    validate_steps("contract_steps", &trigger.contract_steps)?;
    validate_steps("recency_steps", &trigger.recency_steps)?;

    for (name, weight) in [
        ("contract_weight", trigger.contract_weight),
        ("recency_weight", trigger.recency_weight),
    ] {
        if !(0.0..=1.0).contains(&weight) {
            return Err(invalid(format!(
                "trigger.{name} must be between 0.0 and 1.0"
            )));
        }
    }
    let weight_sum = trigger.contract_weight + trigger.recency_weight;
    if (weight_sum - 1.0).abs() > 0.001 {
        return Err(invalid(format!(
            "trigger weights must sum to 1.0 (found {weight_sum:.3})"
        )));
    }

    for (name, threshold) in [
        ("hot_threshold", trigger.hot_threshold),
        ("warm_threshold", trigger.warm_threshold),
    ] {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(invalid(format!(
                "trigger.{name} must be between 0.0 and 1.0"
            )));
        }
    }
    if trigger.hot_threshold < trigger.warm_threshold {
        return Err(invalid(
            "trigger.hot_threshold must not be below trigger.warm_threshold",
        ));
    }

    for (name, boost) in [
        ("hot", trigger.boosts.hot),
        ("warm", trigger.boosts.warm),
        ("cold", trigger.boosts.cold),
    ] {
        if !boost.is_finite() || boost < 0.0 {
            return Err(invalid(format!(
                "trigger.boosts.{name} must be a non-negative number"
            )));
        }
    }

    Ok(())
}

fn validate_aggregate(aggregate: &AggregatePolicy) -> Result<(), PrioritizerError> {
    for (name, action) in [
        ("hot", &aggregate.actions.hot),
        ("warm", &aggregate.actions.warm),
        ("cold", &aggregate.actions.cold),
    ] {
        if action.trim().is_empty() {
            return Err(invalid(format!(
                "aggregate.actions.{name} must be non-empty"
            )));
        }
    }
    Ok(())
}
