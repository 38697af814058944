use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const SETTING_OS: &str = "os";
pub const SETTING_COMPILER: &str = "compiler";
pub const SETTING_ARCH: &str = "arch";
pub const SETTING_BUILD_TYPE: &str = "build_type";

/// Settings a platform descriptor understands, in evaluation order.
pub const KNOWN_SETTINGS: &[&str] = &[
    SETTING_OS,
    SETTING_COMPILER,
    SETTING_ARCH,
    SETTING_BUILD_TYPE,
];

/// Operating system family of the build target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Os {
    Windows,
    Linux,
    Macos,
    Other,
}

impl Os {
    pub fn as_str(self) -> &'static str {
        match self {
            Os::Windows => "windows",
            Os::Linux => "linux",
            Os::Macos => "macos",
            Os::Other => "other",
        }
    }
}

impl Os {
    /// Look up a family by name or alias, case-insensitively. Only the literal
    /// `other` maps to [`Os::Other`]; unrecognized names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "windows" | "win32" | "win64" => Some(Os::Windows),
            "linux" => Some(Os::Linux),
            "macos" | "macosx" | "darwin" | "osx" => Some(Os::Macos),
            "other" => Some(Os::Other),
            _ => None,
        }
    }
}

/// Lenient parse for host settings: anything unrecognized is `Other`.
impl FromStr for Os {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Os::from_name(s).unwrap_or(Os::Other))
    }
}

impl From<String> for Os {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(Os::Other)
    }
}

impl From<Os> for String {
    fn from(os: Os) -> Self {
        os.as_str().to_owned()
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of the build target for one invocation.
///
/// Only `os` is mandatory. Rules that read `compiler`, `architecture` or
/// `build_type` fail with [`ConfigError::MissingPlatformField`] when the
/// field was not provided.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformDescriptor {
    pub os: Os,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_type: Option<String>,
}

impl PlatformDescriptor {
    pub fn new(os: Os) -> Self {
        Self {
            os,
            compiler: None,
            architecture: None,
            build_type: None,
        }
    }

    #[must_use]
    pub fn with_compiler(mut self, compiler: &str) -> Self {
        self.compiler = non_empty(compiler);
        self
    }

    #[must_use]
    pub fn with_architecture(mut self, arch: &str) -> Self {
        self.architecture = non_empty(arch);
        self
    }

    #[must_use]
    pub fn with_build_type(mut self, build_type: &str) -> Self {
        self.build_type = non_empty(build_type);
        self
    }

    /// Build a descriptor from a `setting -> value` map as handed over by the
    /// host package manager. Keys other than [`KNOWN_SETTINGS`] are ignored.
    pub fn from_settings(settings: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let os = settings
            .get(SETTING_OS)
            .and_then(|v| non_empty(v))
            .ok_or_else(|| ConfigError::MissingPlatformField(SETTING_OS.to_owned()))?;

        Ok(Self {
            os: Os::from(os),
            compiler: settings.get(SETTING_COMPILER).and_then(|v| non_empty(v)),
            architecture: settings.get(SETTING_ARCH).and_then(|v| non_empty(v)),
            build_type: settings.get(SETTING_BUILD_TYPE).and_then(|v| non_empty(v)),
        })
    }

    pub fn to_settings(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        out.insert(SETTING_OS.to_owned(), self.os.as_str().to_owned());
        if let Some(c) = &self.compiler {
            out.insert(SETTING_COMPILER.to_owned(), c.clone());
        }
        if let Some(a) = &self.architecture {
            out.insert(SETTING_ARCH.to_owned(), a.clone());
        }
        if let Some(b) = &self.build_type {
            out.insert(SETTING_BUILD_TYPE.to_owned(), b.clone());
        }
        out
    }

    pub fn compiler(&self) -> Result<&str, ConfigError> {
        require(self.compiler.as_deref(), SETTING_COMPILER)
    }

    pub fn architecture(&self) -> Result<&str, ConfigError> {
        require(self.architecture.as_deref(), SETTING_ARCH)
    }

    pub fn build_type(&self) -> Result<&str, ConfigError> {
        require(self.build_type.as_deref(), SETTING_BUILD_TYPE)
    }
}

impl fmt::Display for PlatformDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.os,
            self.compiler.as_deref().unwrap_or("-"),
            self.architecture.as_deref().unwrap_or("-"),
            self.build_type.as_deref().unwrap_or("-"),
        )
    }
}

fn require<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingPlatformField(field.to_owned()))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn os_parses_aliases_case_insensitively() {
        assert_eq!("Windows".parse::<Os>().unwrap(), Os::Windows);
        assert_eq!("LINUX".parse::<Os>().unwrap(), Os::Linux);
        assert_eq!("Macos".parse::<Os>().unwrap(), Os::Macos);
        assert_eq!("darwin".parse::<Os>().unwrap(), Os::Macos);
        assert_eq!("FreeBSD".parse::<Os>().unwrap(), Os::Other);
    }

    #[test]
    fn from_name_rejects_unknown_families() {
        assert_eq!(Os::from_name("Win64"), Some(Os::Windows));
        assert_eq!(Os::from_name("other"), Some(Os::Other));
        assert_eq!(Os::from_name("windwos"), None);
        assert_eq!(Os::from_name("FreeBSD"), None);
    }

    #[test]
    fn os_serializes_lowercase() {
        let json = serde_json::to_string(&Os::Macos).unwrap();
        assert_eq!(json, "\"macos\"");
        let back: Os = serde_json::from_str("\"Windows\"").unwrap();
        assert_eq!(back, Os::Windows);
    }

    #[test]
    fn from_settings_reads_all_fields() {
        let p = PlatformDescriptor::from_settings(&settings(&[
            ("os", "Linux"),
            ("compiler", "gcc"),
            ("arch", "x86_64"),
            ("build_type", "Release"),
            ("compiler.version", "13"),
        ]))
        .unwrap();
        assert_eq!(p.os, Os::Linux);
        assert_eq!(p.compiler.as_deref(), Some("gcc"));
        assert_eq!(p.architecture.as_deref(), Some("x86_64"));
        assert_eq!(p.build_type.as_deref(), Some("Release"));
    }

    #[test]
    fn from_settings_requires_os() {
        let err = PlatformDescriptor::from_settings(&settings(&[("compiler", "gcc")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPlatformField(f) if f == "os"));
    }

    #[test]
    fn blank_os_counts_as_missing() {
        assert!(PlatformDescriptor::from_settings(&settings(&[("os", "  ")])).is_err());
    }

    #[test]
    fn missing_optional_fields_error_on_access() {
        let p = PlatformDescriptor::new(Os::Windows);
        assert!(matches!(
            p.compiler(),
            Err(ConfigError::MissingPlatformField(f)) if f == "compiler"
        ));
        assert!(p.architecture().is_err());
        assert!(p.build_type().is_err());
    }

    #[test]
    fn settings_roundtrip() {
        let p = PlatformDescriptor::new(Os::Macos)
            .with_compiler("apple-clang")
            .with_architecture("armv8");
        let back = PlatformDescriptor::from_settings(&p.to_settings()).unwrap();
        assert_eq!(p, back);
    }
}
