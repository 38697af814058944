use crate::platform::KNOWN_SETTINGS;
use crate::rule::OptionOverrideRule;
use crate::types::DependencyName;
use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Declarative rule table for one dependency node, as written in TOML.
///
/// ```toml
/// table_version = 1
/// name = "v1"
/// dependency = "ffmpeg"
/// requires = "ffmpeg/6.1"
/// settings = ["os", "compiler", "build_type", "arch"]
///
/// [[rule]]
/// when = { os = "windows" }
/// set = [{ dependency = "compiler", key = "runtime", value = "MT" }]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuleTable {
    pub table_version: u32,
    pub name: String,
    pub dependency: DependencyName,
    pub requires: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_tool_version: Option<String>,
    #[serde(default = "default_settings")]
    pub settings: Vec<String>,
    #[serde(default)]
    pub generators: Vec<String>,
    #[serde(default, rename = "rule")]
    pub rules: Vec<OptionOverrideRule>,
}

fn default_settings() -> Vec<String> {
    KNOWN_SETTINGS.iter().map(|s| (*s).to_owned()).collect()
}

impl RuleTable {
    /// Check the table for structural problems: version, package reference,
    /// and rules that read settings the table never declared.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_version != 1 {
            return Err(ConfigError::UnsupportedVersion(self.table_version));
        }
        if self.dependency.trim().is_empty() {
            return Err(ConfigError::EmptyDependency);
        }

        let (name, _version) = parse_reference(&self.requires)?;
        if name != self.dependency.as_str() {
            return Err(ConfigError::RequiresMismatch {
                dependency: self.dependency.to_string(),
                requires: self.requires.clone(),
            });
        }

        for (idx, rule) in self.rules.iter().enumerate() {
            for setting in rule.condition.settings_read() {
                if !self.settings.iter().any(|s| s == setting) {
                    return Err(ConfigError::UndeclaredSetting {
                        rule: idx,
                        setting: setting.to_owned(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Version part of `requires`, e.g. `6.1` for `ffmpeg/6.1`.
    pub fn requires_version(&self) -> Option<&str> {
        parse_reference(&self.requires).ok().map(|(_, v)| v)
    }
}

fn parse_reference(reference: &str) -> Result<(&str, &str), ConfigError> {
    let Some((name, version)) = reference.trim().split_once('/') else {
        return Err(ConfigError::InvalidReference(reference.to_owned()));
    };
    let name = name.trim();
    let version = version.trim();
    if name.is_empty() || version.is_empty() {
        return Err(ConfigError::InvalidReference(reference.to_owned()));
    }
    Ok((name, version))
}

pub fn parse_rule_table_str(input: &str) -> Result<RuleTable, ConfigError> {
    Ok(toml::from_str(input)?)
}

pub fn parse_rule_table_file(path: impl AsRef<Path>) -> Result<RuleTable, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_rule_table_str(&content)
}
