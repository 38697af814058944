use crate::resolver::ConflictPolicy;
use crate::CoreError;
use codecfg_schema::platform::{SETTING_ARCH, SETTING_BUILD_TYPE, SETTING_COMPILER};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// User configuration, read from `~/.config/codecfg/config.toml` or `--config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Built-in variant used when neither `--variant` nor `--rules` is given.
    #[serde(default)]
    pub default_variant: Option<String>,
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
    #[serde(default)]
    pub compiler: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub build_type: Option<String>,
}

impl Config {
    /// Load the default config file, or defaults when it does not exist.
    pub fn load_default() -> Result<Self, CoreError> {
        match default_config_path() {
            Some(path) => Self::load_or_default(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load `path`, or defaults when the file does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self, CoreError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| CoreError::ConfigFile(format!("invalid config {}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| CoreError::ConfigFile(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Platform settings pinned by this config, as a layer over host detection.
    pub fn settings(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        if let Some(c) = &self.compiler {
            out.insert(SETTING_COMPILER.to_owned(), c.clone());
        }
        if let Some(a) = &self.arch {
            out.insert(SETTING_ARCH.to_owned(), a.clone());
        }
        if let Some(b) = &self.build_type {
            out.insert(SETTING_BUILD_TYPE.to_owned(), b.clone());
        }
        out
    }
}

/// `$HOME/.config/codecfg/config.toml`, or `None` without a home directory.
pub fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config/codecfg/config.toml"))
}
