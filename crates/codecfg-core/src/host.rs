use crate::CoreError;
use codecfg_schema::platform::{SETTING_ARCH, SETTING_BUILD_TYPE, SETTING_COMPILER, SETTING_OS};
use codecfg_schema::{Os, PlatformDescriptor};
use std::collections::BTreeMap;
use tracing::debug;

pub const COMPILER_ENV: &str = "CODECFG_COMPILER";
pub const BUILD_TYPE_ENV: &str = "CODECFG_BUILD_TYPE";

/// Platform settings of the running host.
///
/// `os` and `arch` come from the compile target of this binary; `compiler`
/// and `build_type` can be steered with `CODECFG_COMPILER` and
/// `CODECFG_BUILD_TYPE`.
pub fn detect_settings() -> BTreeMap<String, String> {
    settings_for(std::env::consts::OS, std::env::consts::ARCH, |name| {
        std::env::var(name).ok()
    })
}

fn settings_for(
    os: &str,
    arch: &str,
    env: impl Fn(&str) -> Option<String>,
) -> BTreeMap<String, String> {
    let os: Os = os.parse().unwrap_or(Os::Other);
    let compiler = env(COMPILER_ENV)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default_compiler(os).to_owned());
    let build_type = env(BUILD_TYPE_ENV)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "Release".to_owned());

    let mut out = BTreeMap::new();
    out.insert(SETTING_OS.to_owned(), os.as_str().to_owned());
    out.insert(SETTING_ARCH.to_owned(), package_arch(arch).to_owned());
    out.insert(SETTING_COMPILER.to_owned(), compiler);
    out.insert(SETTING_BUILD_TYPE.to_owned(), build_type);
    debug!("detected host settings: {out:?}");
    out
}

fn default_compiler(os: Os) -> &'static str {
    match os {
        Os::Windows => "msvc",
        Os::Macos => "apple-clang",
        Os::Linux | Os::Other => "gcc",
    }
}

/// Map a Rust target architecture to the package manager's naming.
fn package_arch(arch: &str) -> &str {
    match arch {
        "x86" => "x86",
        "aarch64" => "armv8",
        "arm" => "armv7",
        "powerpc64" => "ppc64",
        "s390x" => "s390x",
        "riscv64" => "riscv64",
        other => other,
    }
}

/// Merge settings layers, later layers winning, and build a descriptor.
///
/// Blank values are skipped, so an empty flag keeps the value of an earlier
/// layer.
pub fn platform_from_layers(
    layers: &[&BTreeMap<String, String>],
) -> Result<PlatformDescriptor, CoreError> {
    let mut merged = BTreeMap::new();
    for layer in layers {
        for (k, v) in *layer {
            if v.trim().is_empty() {
                continue;
            }
            merged.insert(k.clone(), v.clone());
        }
    }
    Ok(PlatformDescriptor::from_settings(&merged)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn linux_defaults() {
        let s = settings_for("linux", "x86_64", no_env);
        assert_eq!(s["os"], "linux");
        assert_eq!(s["arch"], "x86_64");
        assert_eq!(s["compiler"], "gcc");
        assert_eq!(s["build_type"], "Release");
    }

    #[test]
    fn windows_and_macos_default_compilers() {
        assert_eq!(settings_for("windows", "x86_64", no_env)["compiler"], "msvc");
        let mac = settings_for("macos", "aarch64", no_env);
        assert_eq!(mac["compiler"], "apple-clang");
        assert_eq!(mac["arch"], "armv8");
    }

    #[test]
    fn env_overrides_compiler_and_build_type() {
        let env = |name: &str| match name {
            COMPILER_ENV => Some("clang".to_owned()),
            BUILD_TYPE_ENV => Some("Debug".to_owned()),
            _ => None,
        };
        let s = settings_for("linux", "x86_64", env);
        assert_eq!(s["compiler"], "clang");
        assert_eq!(s["build_type"], "Debug");
    }

    #[test]
    fn blank_env_is_ignored() {
        let env = |_: &str| Some("  ".to_owned());
        assert_eq!(settings_for("linux", "x86_64", env)["compiler"], "gcc");
    }

    #[test]
    fn detected_settings_build_a_platform() {
        let p = platform_from_layers(&[&detect_settings()]).unwrap();
        assert!(p.compiler.is_some());
        assert!(p.architecture.is_some());
    }

    #[test]
    fn later_layers_win() {
        let host = settings_for("linux", "x86_64", no_env);
        let mut flags = BTreeMap::new();
        flags.insert("os".to_owned(), "Windows".to_owned());
        flags.insert("compiler".to_owned(), "msvc".to_owned());
        let p = platform_from_layers(&[&host, &flags]).unwrap();
        assert_eq!(p.os, Os::Windows);
        assert_eq!(p.compiler.as_deref(), Some("msvc"));
        assert_eq!(p.architecture.as_deref(), Some("x86_64"));
    }

    #[test]
    fn blank_later_layer_keeps_earlier_value() {
        let host = settings_for("windows", "x86_64", no_env);
        let mut flags = BTreeMap::new();
        flags.insert("os".to_owned(), String::new());
        flags.insert("compiler".to_owned(), "  ".to_owned());
        flags.insert("build_type".to_owned(), "Debug".to_owned());
        let p = platform_from_layers(&[&host, &flags]).unwrap();
        assert_eq!(p.os, Os::Windows);
        assert_eq!(p.compiler.as_deref(), Some("msvc"));
        assert_eq!(p.build_type.as_deref(), Some("Debug"));
    }

    #[test]
    fn missing_os_in_all_layers_fails() {
        let mut only = BTreeMap::new();
        only.insert("compiler".to_owned(), "gcc".to_owned());
        assert!(matches!(
            platform_from_layers(&[&only]),
            Err(CoreError::Configuration(_))
        ));
    }
}
