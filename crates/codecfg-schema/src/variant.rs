//! Built-in rule tables for `ffmpeg/6.1`.
//!
//! The three variants track different package-manager releases. They disagree
//! on `ffmpeg.fPIC` for non-Windows targets (`v2` turns it off), so they are
//! kept as separate named tables and never merged.

use crate::table::{parse_rule_table_str, RuleTable};
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub name: &'static str,
    pub description: &'static str,
    pub table: &'static str,
}

impl Variant {
    pub fn parse(&self) -> Result<RuleTable, ConfigError> {
        parse_rule_table_str(self.table)
    }
}

pub const BUILTIN_VARIANTS: &[Variant] = &[
    Variant {
        name: "v1",
        description: "All devices disabled, /MT on Windows, PIC elsewhere, Linux system libraries off",
        table: r#"table_version = 1
name = "v1"
dependency = "ffmpeg"
requires = "ffmpeg/6.1"
required_tool_version = ">=1.60.0"
settings = ["os", "compiler", "build_type", "arch"]
generators = ["json"]

[[rule]]
set = [{ dependency = "ffmpeg", key = "disable_all_devices", value = true }]

[[rule]]
when = { os = "windows" }
set = [{ dependency = "compiler", key = "runtime", value = "MT" }]

[[rule]]
when = { not_os = "windows" }
set = [{ dependency = "ffmpeg", key = "fPIC", value = true }]

[[rule]]
when = { os = "linux" }
set = [
  { dependency = "ffmpeg", key = "with_libalsa", value = false },
  { dependency = "ffmpeg", key = "with_pulse", value = false },
  { dependency = "ffmpeg", key = "with_vulkan", value = false },
  { dependency = "ffmpeg", key = "with_xcb", value = false },
  { dependency = "ffmpeg", key = "with_vaapi", value = false },
  { dependency = "ffmpeg", key = "with_vdpau", value = false },
]
"#,
    },
    Variant {
        name: "v2",
        description: "Device auto-detection left on, /MT on Windows, non-PIC elsewhere, Linux system libraries off",
        table: r#"table_version = 1
name = "v2"
dependency = "ffmpeg"
requires = "ffmpeg/6.1"
required_tool_version = ">=1.53.0"
settings = ["os", "compiler", "build_type", "arch"]
generators = ["json"]

[[rule]]
when = { os = "windows" }
set = [{ dependency = "compiler", key = "runtime", value = "MT" }]

[[rule]]
when = { not_os = "windows" }
set = [{ dependency = "ffmpeg", key = "fPIC", value = false }]

[[rule]]
when = { os = "linux" }
set = [
  { dependency = "ffmpeg", key = "with_libalsa", value = false },
  { dependency = "ffmpeg", key = "with_pulse", value = false },
  { dependency = "ffmpeg", key = "with_vulkan", value = false },
  { dependency = "ffmpeg", key = "with_xcb", value = false },
  { dependency = "ffmpeg", key = "with_xlib", value = false },
  { dependency = "ffmpeg", key = "with_vaapi", value = false },
  { dependency = "ffmpeg", key = "with_vdpau", value = false },
]
"#,
    },
    Variant {
        name: "v3",
        description: "/MT only for MSVC toolchains, PIC and no device auto-detection elsewhere, Linux system libraries off",
        table: r#"table_version = 1
name = "v3"
dependency = "ffmpeg"
requires = "ffmpeg/6.1"
required_tool_version = ">=2.0.0"
settings = ["os", "compiler", "build_type", "arch"]
generators = ["json"]

[[rule]]
when = { os = "windows", compiler = ["msvc", "Visual Studio"] }
set = [{ dependency = "compiler", key = "runtime", value = "MT" }]

[[rule]]
when = { not_os = "windows" }
set = [
  { dependency = "ffmpeg", key = "fPIC", value = true },
  { dependency = "ffmpeg", key = "disable_all_devices", value = true },
]

[[rule]]
when = { os = "linux" }
set = [
  { dependency = "ffmpeg", key = "with_libalsa", value = false },
  { dependency = "ffmpeg", key = "with_pulse", value = false },
  { dependency = "ffmpeg", key = "with_vulkan", value = false },
  { dependency = "ffmpeg", key = "with_xcb", value = false },
  { dependency = "ffmpeg", key = "with_xlib", value = false },
  { dependency = "ffmpeg", key = "with_vaapi", value = false },
  { dependency = "ffmpeg", key = "with_vdpau", value = false },
]
"#,
    },
];

pub fn get_variant(name: &str) -> Option<&'static Variant> {
    BUILTIN_VARIANTS.iter().find(|v| v.name == name)
}

pub fn list_variants() -> &'static [Variant] {
    BUILTIN_VARIANTS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BuiltinCatalog, OptionCatalog};
    use crate::option::OptionValue;

    #[test]
    fn all_variants_parse_and_validate() {
        for variant in BUILTIN_VARIANTS {
            let table = variant.parse();
            assert!(
                table.is_ok(),
                "variant '{}' failed to parse: {:?}",
                variant.name,
                table.err()
            );
            let table = table.unwrap();
            assert_eq!(table.name, variant.name);
            table.validate().unwrap();
        }
    }

    #[test]
    fn all_variant_assignments_are_in_builtin_catalog() {
        let catalog = BuiltinCatalog::new();
        for variant in BUILTIN_VARIANTS {
            let table = variant.parse().unwrap();
            for rule in &table.rules {
                for a in &rule.assignments {
                    catalog
                        .validate(&a.dependency, &a.key, &a.value)
                        .unwrap_or_else(|e| panic!("variant '{}': {e}", variant.name));
                }
            }
        }
    }

    #[test]
    fn get_variant_by_name() {
        assert!(get_variant("v1").is_some());
        assert!(get_variant("v9").is_none());
    }

    #[test]
    fn all_variants_have_unique_names() {
        let mut names: Vec<&str> = BUILTIN_VARIANTS.iter().map(|v| v.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), BUILTIN_VARIANTS.len());
    }

    #[test]
    fn v2_keeps_its_own_fpic_value() {
        let fpic = |name: &str| {
            get_variant(name)
                .unwrap()
                .parse()
                .unwrap()
                .rules
                .iter()
                .flat_map(|r| r.assignments.iter())
                .find(|a| a.key == "fPIC")
                .map(|a| a.value.clone())
        };
        assert_eq!(fpic("v1"), Some(OptionValue::Bool(true)));
        assert_eq!(fpic("v2"), Some(OptionValue::Bool(false)));
        assert_eq!(fpic("v3"), Some(OptionValue::Bool(true)));
    }
}
