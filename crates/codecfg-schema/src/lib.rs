//! Data model for codecfg option resolution.
//!
//! This crate defines the schema layer: the target platform (`PlatformDescriptor`),
//! option values and sets (`OptionSet`), platform-conditioned override rules
//! (`OptionOverrideRule`), declarative TOML rule tables (`RuleTable`), the option
//! catalog a host package manager exposes (`OptionCatalog`), the built-in
//! versioned rule-set variants, resolved-config lock files (`ResolvedConfig`), and
//! build-info flag extraction.

pub mod buildinfo;
pub mod catalog;
pub mod lock;
pub mod option;
pub mod platform;
pub mod rule;
pub mod table;
pub mod types;
pub mod variant;

pub use buildinfo::{
    build_flags, parse_build_info_file, parse_build_info_str, BuildInfo, BuildInfoError,
};
pub use catalog::{BuiltinCatalog, DependencySchema, OptionCatalog, OptionKind};
pub use lock::{LockError, ResolvedConfig};
pub use option::{OptionSet, OptionValue};
pub use platform::{Os, PlatformDescriptor};
pub use rule::{Assignment, OptionOverrideRule, RuleCondition};
pub use table::{parse_rule_table_file, parse_rule_table_str, RuleTable};
pub use types::{ConfigId, DependencyName, OptionKey, ShortId};
pub use variant::{get_variant, list_variants, Variant, BUILTIN_VARIANTS};

use thiserror::Error;

/// Configuration problems detected before any option is handed to the build.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read rule table: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rule table: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("unsupported table_version: {0}, expected 1")]
    UnsupportedVersion(u32),
    #[error("dependency name must not be empty")]
    EmptyDependency,
    #[error("invalid package reference '{0}', expected '<name>/<version>'")]
    InvalidReference(String),
    #[error("requires '{requires}' does not match dependency '{dependency}'")]
    RequiresMismatch { dependency: String, requires: String },
    #[error("rule {rule} reads setting '{setting}' which the table does not declare")]
    UndeclaredSetting { rule: usize, setting: String },
    #[error("platform field '{0}' is required but was not provided")]
    MissingPlatformField(String),
    #[error("unknown dependency '{0}'")]
    UnknownDependency(String),
    #[error("unknown option '{key}' for dependency '{dependency}'")]
    UnknownOption { dependency: String, key: String },
    #[error("invalid value {value} for option '{dependency}.{key}': expected {expected}")]
    InvalidValue {
        dependency: String,
        key: String,
        value: String,
        expected: String,
    },
}
