//! Flag extraction from the package manager's JSON build-info output.
//!
//! After the host runtime installs the resolved dependencies, its `json`
//! generator writes a build-info document listing, per dependency, fields such
//! as `include_paths`, `lib_paths` and `libs`. Native build scripts need those
//! as command-line flags.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildInfoError {
    #[error("failed to read build info: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse build info: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildInfo {
    #[serde(default)]
    pub dependencies: Vec<Map<String, Value>>,
}

pub fn parse_build_info_str(input: &str) -> Result<BuildInfo, BuildInfoError> {
    Ok(serde_json::from_str(input)?)
}

pub fn parse_build_info_file(path: impl AsRef<Path>) -> Result<BuildInfo, BuildInfoError> {
    let content = fs::read_to_string(path)?;
    parse_build_info_str(&content)
}

/// Collect `field` from every dependency and render each value as
/// `<option>"<prefix><value>"`, space separated.
///
/// Array fields are flattened one level; dependencies without the field
/// contribute nothing.
pub fn build_flags(info: &BuildInfo, field: &str, prefix: &str, option: &str) -> String {
    let mut values = Vec::new();
    for dep in &info.dependencies {
        match dep.get(field) {
            Some(Value::String(s)) => values.push(s.as_str()),
            Some(Value::Array(items)) => {
                values.extend(items.iter().filter_map(Value::as_str));
            }
            _ => {}
        }
    }
    values
        .iter()
        .map(|v| format!("{option}\"{prefix}{v}\""))
        .collect::<Vec<_>>()
        .join(" ")
}
