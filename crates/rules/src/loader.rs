//! Rule file discovery and parsing.

use crate::types::{Rule, RuleEntry};
use sinapsi_core::{AppError, AppResult};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Discover rule files across candidate directories.
///
/// Each directory is scanned non-recursively for `.json`, `.yaml` and
/// `.yml` files. When the same file name exists in several directories,
/// the earliest directory wins. The result is ordered by file name, which
/// is the merge (and therefore priority) order.
pub fn discover_rule_files(dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut by_name: BTreeMap<OsString, PathBuf> = BTreeMap::new();

    for dir in dirs {
        if !dir.is_dir() {
            tracing::debug!("Rule directory not found: {:?}", dir);
            continue;
        }

        for entry in walkdir::WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_rule_file(path) {
                continue;
            }
            by_name
                .entry(entry.file_name().to_os_string())
                .or_insert_with(|| path.to_path_buf());
        }
    }

    by_name.into_values().collect()
}

fn is_rule_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("json") | Some("yaml") | Some("yml")
    )
}

/// Load the rules of a single file, in array order.
///
/// The file is either a bare array of entries or an object with a `rules`
/// array. A file that cannot be read or parsed is an error; individual
/// entries that are malformed or invalid are skipped with a warning.
pub fn load_rule_file(path: &Path) -> AppResult<Vec<Rule>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Rules(format!("Failed to read rule file {:?}: {}", path, e))
    })?;

    let document: serde_json::Value = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&contents).map_err(|e| {
            AppError::Rules(format!("Failed to parse rule JSON {:?}: {}", path, e))
        })?,
        _ => serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Rules(format!("Failed to parse rule YAML {:?}: {}", path, e))
        })?,
    };

    let entries = match document {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("rules") {
            Some(serde_json::Value::Array(items)) => items,
            _ => {
                return Err(AppError::Rules(format!(
                    "Rule file {:?} has no 'rules' array",
                    path
                )))
            }
        },
        _ => {
            return Err(AppError::Rules(format!(
                "Rule file {:?} must contain an array or a 'rules' object",
                path
            )))
        }
    };

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("rules");

    let mut rules = Vec::with_capacity(entries.len());
    for (index, value) in entries.into_iter().enumerate() {
        let fallback_id = format!("{}#{}", stem, index);

        let entry: RuleEntry = match serde_json::from_value(value) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping malformed rule {}: {}", fallback_id, e);
                continue;
            }
        };

        match entry.into_rule(&fallback_id) {
            Ok(rule) => rules.push(rule),
            Err(e) => tracing::warn!("Skipping rule {}: {}", fallback_id, e),
        }
    }

    tracing::debug!("Loaded {} rules from {:?}", rules.len(), path);
    Ok(rules)
}
