use crate::error::{PrioritizerError, Result};
use crate::types::config::PrioritizerConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "prioritizer.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".prioritizer/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/prioritizer/config.toml";

/// Merges global, project, local and explicit config files, in that order.
/// With no files present the built-in defaults apply.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<PrioritizerConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref(), explicit)
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
    explicit: Option<&Path>,
) -> Result<PrioritizerConfig> {
    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_CONFIG_FILE))?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(PrioritizerError::PathNotFound(path.display().to_string()));
        }
        merge_file_if_exists(&mut merged, path)?;
    }

    merged
        .try_into()
        .map_err(|e: toml::de::Error| PrioritizerError::ConfigParse(e.to_string()))
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    tracing::debug!(path = %path.display(), "merging config layer");
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| PrioritizerError::ConfigParse(format!("{}: {}", path.display(), e)))
}

/// Tables merge key by key; any other value (arrays included) replaces.
fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}
