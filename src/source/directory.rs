use super::{normalize, SignalSource};
use crate::batch::normalize_domain;
use crate::error::{FetchError, PrioritizerError, Result};
use crate::types::signals::SignalRecord;
use chrono::NaiveDate;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Reads exported provider payloads from `<dir>/<domain>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(PrioritizerError::PathNotFound(root.display().to_string()));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn payload_path(&self, domain: &str) -> PathBuf {
        self.root.join(format!("{domain}.json"))
    }

    /// Every domain with a payload in the directory, normalized the same way
    /// as command-line domains, sorted and deduplicated.
    pub fn domains(&self) -> Vec<String> {
        let mut domains = self
            .payload_files()
            .into_iter()
            .filter_map(|(stem, _)| normalize_domain(&stem))
            .collect::<Vec<_>>();
        domains.sort();
        domains.dedup();
        domains
    }

    /// `<domain>.json` when it exists, otherwise any payload whose file stem
    /// normalizes to `domain` (e.g. `Acme.com.json` for `acme.com`).
    fn resolve(&self, domain: &str) -> Option<PathBuf> {
        let exact = self.payload_path(domain);
        if exact.is_file() {
            return Some(exact);
        }
        self.payload_files()
            .into_iter()
            .find(|(stem, _)| normalize_domain(stem).as_deref() == Some(domain))
            .map(|(_, path)| path)
    }

    fn payload_files(&self) -> Vec<(String, PathBuf)> {
        WalkDir::new(&self.root)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .is_some_and(|extension| extension == "json")
            })
            .filter_map(|entry| {
                let stem = entry.path().file_stem()?.to_str()?.to_string();
                Some((stem, entry.into_path()))
            })
            .collect()
    }
}

impl SignalSource for DirectorySource {
    fn fetch(&self, domain: &str, today: NaiveDate) -> std::result::Result<SignalRecord, FetchError> {
        if !is_plain_domain(domain) {
            return Err(FetchError::Malformed {
                domain: domain.to_string(),
                detail: "domain must not contain path separators".to_string(),
            });
        }

        let path = self
            .resolve(domain)
            .ok_or_else(|| FetchError::NotFound(domain.to_string()))?;
        let content = std::fs::read_to_string(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => FetchError::NotFound(domain.to_string()),
            ErrorKind::TimedOut => FetchError::Timeout(domain.to_string()),
            ErrorKind::InvalidData => FetchError::Malformed {
                domain: domain.to_string(),
                detail: err.to_string(),
            },
            _ => FetchError::Unreachable {
                domain: domain.to_string(),
                detail: err.to_string(),
            },
        })?;
        let bundle: Value = serde_json::from_str(&content).map_err(|err| FetchError::Malformed {
            domain: domain.to_string(),
            detail: err.to_string(),
        })?;
        normalize::record_from_bundle(domain, &bundle, today)
    }
}

fn is_plain_domain(domain: &str) -> bool {
    !domain.is_empty()
        && !domain.contains(['/', '\\'])
        && domain != "."
        && domain != ".."
}
