use super::{json_pretty, EXIT_SUCCESS};
use codecfg_core::{default_config_path, Config, ConflictPolicy};
use codecfg_schema::get_variant;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fields to change in the config file. Blank strings clear a field.
#[derive(Debug, Default)]
pub struct ConfigUpdate {
    pub default_variant: Option<String>,
    pub conflict_policy: Option<ConflictPolicy>,
    pub compiler: Option<String>,
    pub arch: Option<String>,
    pub build_type: Option<String>,
}

impl ConfigUpdate {
    fn is_empty(&self) -> bool {
        self.default_variant.is_none()
            && self.conflict_policy.is_none()
            && self.compiler.is_none()
            && self.arch.is_none()
            && self.build_type.is_none()
    }

    fn apply(self, config: &mut Config) -> Result<(), String> {
        if let Some(v) = self.default_variant {
            if !v.trim().is_empty() && get_variant(v.trim()).is_none() {
                return Err(format!("configuration error: unknown variant '{v}'"));
            }
            config.default_variant = field(v);
        }
        if let Some(p) = self.conflict_policy {
            config.conflict_policy = p;
        }
        if let Some(c) = self.compiler {
            config.compiler = field(c);
        }
        if let Some(a) = self.arch {
            config.arch = field(a);
        }
        if let Some(b) = self.build_type {
            config.build_type = field(b);
        }
        Ok(())
    }
}

fn field(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

pub fn run(
    config: &Config,
    path: Option<&Path>,
    update: ConfigUpdate,
    json: bool,
) -> Result<u8, String> {
    let path: PathBuf = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path().ok_or("cannot locate config file: HOME is not set")?,
    };

    if update.is_empty() {
        if json {
            println!("{}", json_pretty(config)?);
        } else {
            let text = toml::to_string_pretty(config)
                .map_err(|e| format!("failed to render config: {e}"))?;
            println!("# {}", path.display());
            print!("{text}");
        }
        return Ok(EXIT_SUCCESS);
    }

    let mut updated = config.clone();
    update.apply(&mut updated)?;
    debug!("saving config to {}", path.display());
    updated.save(&path).map_err(|e| e.to_string())?;

    if json {
        println!("{}", json_pretty(&updated)?);
    } else {
        println!("config written to {}", path.display());
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_sets_and_clears_fields() {
        let mut config = Config {
            compiler: Some("gcc".to_owned()),
            ..Config::default()
        };
        ConfigUpdate {
            default_variant: Some("v3".to_owned()),
            conflict_policy: Some(ConflictPolicy::LastWriteWins),
            compiler: Some(String::new()),
            ..ConfigUpdate::default()
        }
        .apply(&mut config)
        .unwrap();
        assert_eq!(config.default_variant.as_deref(), Some("v3"));
        assert_eq!(config.conflict_policy, ConflictPolicy::LastWriteWins);
        assert!(config.compiler.is_none());
    }

    #[test]
    fn update_rejects_unknown_variant() {
        let mut config = Config::default();
        let err = ConfigUpdate {
            default_variant: Some("v7".to_owned()),
            ..ConfigUpdate::default()
        }
        .apply(&mut config)
        .unwrap_err();
        assert!(err.starts_with("configuration error:"));
        assert!(config.default_variant.is_none());
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(ConfigUpdate::default().is_empty());
    }
}
