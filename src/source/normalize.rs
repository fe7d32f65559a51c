//! Provider payload bundle -> [`SignalRecord`].
//!
//! A bundle is a JSON object with optional sections (`firmographic`,
//! `technographic`, `cloud_spend`, `spend`, `fai`, `contracts`). Provider
//! responses are loosely shaped, so every section is looked up under several
//! known keys and anything unrecognized is treated as unknown.

use crate::error::FetchError;
use crate::types::signals::{SignalRecord, TechInstall};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

const INSTALL_LIST_KEYS: [&str; 7] = [
    "products",
    "technologies",
    "results",
    "items",
    "data",
    "installations",
    "installs",
];
const INSTALL_NAME_KEYS: [&str; 4] = ["productName", "technologyName", "name", "vendorName"];
const VERIFIED_DATE_KEYS: [&str; 7] = [
    "lastVerified",
    "verificationDate",
    "lastSeen",
    "firstSeen",
    "lastUpdated",
    "lastVerifiedDate",
    "firstVerifiedDate",
];
const SPEND_KEYS: [&str; 8] = [
    "totalSpendAmount",
    "totalSpend",
    "totalITSpendAmount",
    "totalITSpend",
    "annualSpend",
    "totalAnnualSpend",
    "itSpend",
    "totalItSpend",
];
const CLOUD_PROVIDERS: [&str; 12] = [
    "Amazon Web Services",
    "AWS",
    "Amazon",
    "Microsoft Azure",
    "Azure",
    "Google Cloud",
    "Google Cloud Platform",
    "GCP",
    "Oracle Cloud",
    "Oracle Cloud Infrastructure",
    "OCI",
    "IBM Cloud",
];
const CATEGORY_LIST_KEYS: [&str; 4] = [
    "categories",
    "categorySpend",
    "spendByCategory",
    "categoryBreakdown",
];
const CATEGORY_NAME_KEYS: [&str; 3] = ["category", "name", "categoryName"];
const CATEGORY_AMOUNT_KEYS: [&str; 6] = [
    "totalSpendAmount",
    "spendAmount",
    "totalSpend",
    "spend",
    "value",
    "amount",
];
const TOP_LIMIT: usize = 3;
const FAI_LIST_KEYS: [&str; 5] = ["functionalAreas", "departments", "results", "data", "items"];
const FAI_NAME_KEYS: [&str; 4] = ["name", "functionalArea", "department", "function"];
const CONTRACT_LIST_KEYS: [&str; 5] = ["contracts", "results", "items", "data", "contractsList"];
const RENEWAL_DATE_KEYS: [&str; 7] = [
    "renewalDate",
    "contractRenewalDate",
    "endDate",
    "expirationDate",
    "contractEndDate",
    "renewal",
    "renewal_date",
];

pub fn record_from_bundle(
    domain: &str,
    bundle: &Value,
    today: NaiveDate,
) -> Result<SignalRecord, FetchError> {
    let sections = bundle.as_object().ok_or_else(|| FetchError::Malformed {
        domain: domain.to_string(),
        detail: "payload bundle must be a JSON object".to_string(),
    })?;

    let mut record = SignalRecord::new(domain);

    if let Some(firmographic) = section(sections, "firmographic").and_then(Value::as_object) {
        record.company_name = first_string(firmographic, &["name"]);
        record.industry = first_string(firmographic, &["industry"]);
        record.employee_count = firmographic
            .get("employeeCount")
            .and_then(parse_amount)
            .filter(|count| *count >= 0.0)
            .map(|count| count.round() as u64);
        record.it_spend = firmographic.get("itSpend").and_then(parse_amount);
    }

    if let Some(technographic) = section(sections, "technographic") {
        let installs = list_under(technographic, &INSTALL_LIST_KEYS)
            .map(Vec::as_slice)
            .unwrap_or_default();
        record.tech_installs = installs
            .iter()
            .filter_map(Value::as_object)
            .map(|item| TechInstall {
                name: first_string(item, &INSTALL_NAME_KEYS)
                    .unwrap_or_else(|| "unknown".to_string()),
                intensity: item.get("intensity").and_then(Value::as_f64),
            })
            .collect();
        record.tech_verified_date = installs
            .iter()
            .filter_map(Value::as_object)
            .flat_map(|item| VERIFIED_DATE_KEYS.iter().filter_map(|key| item.get(*key)))
            .filter_map(parse_date)
            .max();
    }

    if let Some(cloud) = section(sections, "cloud_spend") {
        record.cloud_monthly_spend = cloud_monthly_spend(cloud);
        record.top_cloud_services = top_cloud_services(cloud);
    }

    if let Some(spend) = section(sections, "spend").and_then(Value::as_object) {
        record.company_spend = SPEND_KEYS
            .iter()
            .filter_map(|key| spend.get(*key))
            .filter_map(parse_amount)
            .fold(None, |best: Option<f64>, value| {
                Some(best.map_or(value, |best| best.max(value)))
            });
        record.top_spend_categories = top_spend_categories(spend);
    }

    if let Some(fai) = section(sections, "fai").and_then(Value::as_object) {
        record.company_fai = FAI_LIST_KEYS
            .iter()
            .filter_map(|key| fai.get(*key).and_then(Value::as_array))
            .flatten()
            .filter_map(Value::as_object)
            .filter_map(|item| first_string(item, &FAI_NAME_KEYS))
            .collect();
    }

    if let Some(contracts) = section(sections, "contracts") {
        record.contract_renewal_date = renewal_date(contracts, today);
    }

    Ok(record)
}

fn section<'a>(sections: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    sections.get(key).filter(|value| !value.is_null())
}

fn list_under<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    if let Some(list) = value.as_array() {
        return Some(list);
    }
    let object = value.as_object()?;
    keys.iter()
        .find_map(|key| object.get(*key).and_then(Value::as_array))
}

fn first_string(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn cloud_monthly_spend(cloud: &Value) -> Option<f64> {
    let services = cloud.get("technologyServices")?.as_array()?;
    let spends = services
        .iter()
        .filter_map(|service| service.get("vendors").and_then(Value::as_array))
        .flatten()
        .filter_map(|vendor| vendor.get("estimatedMonthlySpend").and_then(Value::as_f64))
        .collect::<Vec<_>>();
    if spends.is_empty() {
        None
    } else {
        Some(spends.iter().sum())
    }
}

/// Allowlisted cloud providers ranked by summed monthly spend.
fn top_cloud_services(cloud: &Value) -> Vec<String> {
    let vendors = cloud
        .get("technologyServices")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter_map(|service| service.get("vendors").and_then(Value::as_array))
        .flatten()
        .filter_map(Value::as_object);

    let mut totals: Vec<(String, f64)> = Vec::new();
    for vendor in vendors {
        let Some(name) = first_string(vendor, &["vendorName", "name"]) else {
            continue;
        };
        if !is_cloud_provider(&name) {
            continue;
        }
        let spend = vendor
            .get("estimatedMonthlySpend")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        match totals.iter_mut().find(|(known, _)| *known == name) {
            Some((_, total)) => *total += spend,
            None => totals.push((name, spend)),
        }
    }
    top_names(totals)
}

fn is_cloud_provider(name: &str) -> bool {
    let lowered = name.to_lowercase();
    CLOUD_PROVIDERS
        .iter()
        .any(|provider| lowered.contains(&provider.to_lowercase()))
}

/// Spend categories ranked by amount across every known breakdown list.
fn top_spend_categories(spend: &Map<String, Value>) -> Vec<String> {
    let pairs = CATEGORY_LIST_KEYS
        .iter()
        .filter_map(|key| spend.get(*key).and_then(Value::as_array))
        .flatten()
        .filter_map(Value::as_object)
        .filter_map(|item| {
            let name = first_string(item, &CATEGORY_NAME_KEYS)?;
            let amount = CATEGORY_AMOUNT_KEYS
                .iter()
                .filter_map(|key| item.get(*key))
                .find_map(parse_amount)?;
            Some((name, amount))
        })
        .collect();
    top_names(pairs)
}

/// Highest amounts first; equal amounts keep their first-seen order.
fn top_names(mut pairs: Vec<(String, f64)>) -> Vec<String> {
    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
    pairs
        .into_iter()
        .take(TOP_LIMIT)
        .map(|(name, _)| name)
        .collect()
}

/// Soonest renewal on or after `today`; otherwise the most recent lapsed one.
fn renewal_date(contracts: &Value, today: NaiveDate) -> Option<NaiveDate> {
    let candidates: Vec<&Value> = match list_under(contracts, &CONTRACT_LIST_KEYS) {
        Some(list) => list.iter().collect(),
        None => vec![contracts],
    };

    let dates = candidates
        .into_iter()
        .filter_map(Value::as_object)
        .flat_map(|item| RENEWAL_DATE_KEYS.iter().filter_map(|key| item.get(*key)))
        .filter_map(parse_date)
        .collect::<Vec<_>>();

    let upcoming = dates.iter().filter(|date| **date >= today).min().copied();
    upcoming.or_else(|| dates.iter().max().copied())
}

/// Numbers, or strings such as `"$1,250,000"`.
pub fn parse_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.replace(['$', ','], "").trim().parse::<f64>().ok(),
        _ => None,
    }?;
    amount.is_finite().then_some(amount)
}

/// RFC 3339 timestamps, naive timestamps, or plain `YYYY-MM-DD`.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.naive_utc().date());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(timestamp.date());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}
