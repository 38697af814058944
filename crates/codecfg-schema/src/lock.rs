use crate::option::OptionSet;
use crate::platform::PlatformDescriptor;
use crate::types::{ConfigId, DependencyName, ShortId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const LOCK_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("lock file I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("lock file parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("lock file serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("unsupported lock_version: {0}, expected {LOCK_VERSION}")]
    UnsupportedVersion(u32),
    #[error("lock file config_id mismatch: lock has '{lock_id}', recomputed '{computed_id}'")]
    ConfigIdMismatch {
        lock_id: String,
        computed_id: String,
    },
    #[error("lock file platform drift: {0}")]
    PlatformDrift(String),
}

/// The resolved options of one dependency node for one platform.
///
/// `config_id` is computed from the locked fields, so the same options for
/// the same platform always carry the same identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub lock_version: u32,
    pub config_id: String,
    pub short_id: String,
    pub dependency: DependencyName,
    pub requires: String,
    /// Name of the rule table the options were resolved from.
    pub variant: String,
    pub platform: PlatformDescriptor,
    pub options: OptionSet,
}

impl ResolvedConfig {
    pub fn new(
        dependency: DependencyName,
        requires: &str,
        variant: &str,
        platform: PlatformDescriptor,
        options: OptionSet,
    ) -> Self {
        let lock = ResolvedConfig {
            lock_version: LOCK_VERSION,
            config_id: String::new(), // computed below
            short_id: String::new(),
            dependency,
            requires: requires.to_owned(),
            variant: variant.to_owned(),
            platform,
            options,
        };

        let (id, short) = lock.compute_identity();
        ResolvedConfig {
            config_id: id.into_inner(),
            short_id: short.into_inner(),
            ..lock
        }
    }

    /// Compute the identity from the locked state.
    ///
    /// The variant name is not part of the hash: two tables that resolve to
    /// the same options produce the same configuration.
    pub fn compute_identity(&self) -> (ConfigId, ShortId) {
        let mut hasher = blake3::Hasher::new();

        hasher.update(format!("dep:{}", self.dependency).as_bytes());
        hasher.update(format!("requires:{}", self.requires).as_bytes());

        for (setting, value) in self.platform.to_settings() {
            hasher.update(format!("setting:{setting}={value}").as_bytes());
        }

        // OptionSet iterates in sorted order
        for (dep, key, value) in self.options.iter() {
            hasher.update(format!("opt:{dep}.{key}={}", value.canonical()).as_bytes());
        }

        let hex = hasher.finalize().to_hex().to_string();
        let short = hex[..12].to_owned();
        (ConfigId::new(hex), ShortId::new(short))
    }

    /// Verify that the stored config_id matches the recomputed one.
    pub fn verify_integrity(&self) -> Result<ConfigId, LockError> {
        if self.lock_version != LOCK_VERSION {
            return Err(LockError::UnsupportedVersion(self.lock_version));
        }
        let (id, _) = self.compute_identity();
        if self.config_id != id.as_str() {
            return Err(LockError::ConfigIdMismatch {
                lock_id: self.config_id.clone(),
                computed_id: id.into_inner(),
            });
        }
        Ok(id)
    }

    /// Check that this lock was produced for `platform`.
    pub fn verify_platform(&self, platform: &PlatformDescriptor) -> Result<(), LockError> {
        if self.platform.os != platform.os {
            return Err(LockError::PlatformDrift(format!(
                "os changed: lock has '{}', current is '{}'",
                self.platform.os, platform.os
            )));
        }
        let current_settings = platform.to_settings();
        for (setting, value) in &self.platform.to_settings() {
            if let Some(current) = current_settings.get(setting) {
                if current != value {
                    return Err(LockError::PlatformDrift(format!(
                        "{setting} changed: lock has '{value}', current is '{current}'"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), LockError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        std::io::Write::write_all(&mut tmp, content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| LockError::Io(e.error))?;
        Ok(())
    }

    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, LockError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
