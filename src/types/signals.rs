use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechInstall {
    pub name: String,
    pub intensity: Option<f64>,
}

/// Normalized signals for one company. Every optional field may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub domain: String,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub employee_count: Option<u64>,
    pub it_spend: Option<f64>,
    pub company_spend: Option<f64>,
    #[serde(default)]
    pub tech_installs: Vec<TechInstall>,
    pub cloud_monthly_spend: Option<f64>,
    /// Up to three cloud providers by monthly spend. Descriptive only.
    #[serde(default)]
    pub top_cloud_services: Vec<String>,
    /// Up to three spend categories by amount. Descriptive only.
    #[serde(default)]
    pub top_spend_categories: Vec<String>,
    #[serde(default)]
    pub company_fai: BTreeSet<String>,
    pub contract_renewal_date: Option<NaiveDate>,
    pub tech_verified_date: Option<NaiveDate>,
}

impl SignalRecord {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }
}
