pub mod check;
pub mod compare;
pub mod completions;
pub mod config;
pub mod flags;
pub mod man_pages;
pub mod resolve;
pub mod show;
pub mod variants;
pub mod verify;

use clap::Args;
use codecfg_core::{detect_settings, platform_from_layers, Config, CoreError};
use codecfg_schema::platform::{SETTING_ARCH, SETTING_BUILD_TYPE, SETTING_COMPILER, SETTING_OS};
use codecfg_schema::{get_variant, parse_rule_table_file, ConfigError, PlatformDescriptor, RuleTable};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_CONFLICT: u8 = 3;

pub const DEFAULT_VARIANT: &str = "v1";

/// Platform fields that override host detection and the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct PlatformArgs {
    /// Target OS family (windows, linux, macos, or anything else).
    #[arg(long)]
    pub os: Option<String>,
    /// Target compiler (e.g. msvc, gcc, clang).
    #[arg(long)]
    pub compiler: Option<String>,
    /// Target architecture (e.g. x86_64, armv8).
    #[arg(long)]
    pub arch: Option<String>,
    /// Build type (e.g. Release, Debug).
    #[arg(long)]
    pub build_type: Option<String>,
}

impl PlatformArgs {
    fn settings(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        for (name, value) in [
            (SETTING_OS, &self.os),
            (SETTING_COMPILER, &self.compiler),
            (SETTING_ARCH, &self.arch),
            (SETTING_BUILD_TYPE, &self.build_type),
        ] {
            if let Some(v) = value {
                out.insert(name.to_owned(), v.clone());
            }
        }
        out
    }
}

/// Host detection, then the config file, then command-line flags.
pub fn target_platform(config: &Config, args: &PlatformArgs) -> Result<PlatformDescriptor, String> {
    let platform =
        platform_from_layers(&[&detect_settings(), &config.settings(), &args.settings()])
            .map_err(|e| e.to_string())?;
    debug!("target platform: {platform}");
    Ok(platform)
}

pub fn config_error(e: ConfigError) -> String {
    CoreError::from(e).to_string()
}

/// Load a built-in variant by name, or a rule table file by path.
pub fn load_table(name_or_path: &str) -> Result<RuleTable, String> {
    if let Some(v) = get_variant(name_or_path) {
        debug!("using built-in variant {}", v.name);
        return v.parse().map_err(config_error);
    }
    let path = Path::new(name_or_path);
    debug!("loading rule table from {}", path.display());
    if !path.exists() {
        return Err(format!(
            "configuration error: '{name_or_path}' is neither a built-in variant nor a rule table file"
        ));
    }
    parse_rule_table_file(path).map_err(config_error)
}

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn colorize_bool(value: bool) -> String {
    use console::Style;
    if value {
        Style::new().green().apply_to("true").to_string()
    } else {
        Style::new().red().apply_to("false").to_string()
    }
}
