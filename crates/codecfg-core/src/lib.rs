//! Option resolution for codecfg.
//!
//! This crate ties the schema layer together into the `Resolver`, the single
//! pass fold that turns a platform and an ordered rule list into a validated
//! `OptionSet`. It also provides host platform detection, the tool
//! configuration file, parallel resolution across a platform matrix, and
//! comparison of two rule tables for the same platform.

pub mod compare;
pub mod config;
pub mod host;
pub mod matrix;
pub mod resolver;

pub use compare::{compare_tables, TableComparison, ValueChange};
pub use config::{default_config_path, Config};
pub use host::{detect_settings, platform_from_layers};
pub use matrix::resolve_matrix;
pub use resolver::{ConflictPolicy, Resolution, Resolver};

use codecfg_schema::OptionValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Configuration(#[from] codecfg_schema::ConfigError),
    #[error(
        "conflict: rule {first_rule} sets {dependency}.{key} = {first}, rule {second_rule} sets {second}"
    )]
    Conflict {
        dependency: String,
        key: String,
        first: OptionValue,
        second: OptionValue,
        first_rule: usize,
        second_rule: usize,
    },
    #[error("lock error: {0}")]
    Lock(#[from] codecfg_schema::LockError),
    #[error("config file error: {0}")]
    ConfigFile(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
