use crate::option::{OptionSet, OptionValue};
use crate::platform::{
    Os, PlatformDescriptor, SETTING_ARCH, SETTING_BUILD_TYPE, SETTING_COMPILER, SETTING_OS,
};
use crate::types::{DependencyName, OptionKey};
use crate::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// Conjunction of platform predicates. An empty condition always holds.
///
/// Predicates are checked in a fixed order (`os`, `not_os`, `compiler`, `arch`,
/// `build_type`) and evaluation stops at the first one that fails, so a rule
/// for Windows never needs the compiler of a Linux platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleCondition {
    #[serde(
        default,
        deserialize_with = "known_os",
        skip_serializing_if = "Option::is_none"
    )]
    pub os: Option<Os>,
    #[serde(
        default,
        deserialize_with = "known_os",
        skip_serializing_if = "Option::is_none"
    )]
    pub not_os: Option<Os>,
    /// Any-of list of compiler names. Matched exactly and case-sensitively,
    /// so `MSVC` does not match a condition listing `msvc`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compiler: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_type: Option<String>,
}

/// OS names in rule tables must name a known family or `other`.
fn known_os<'de, D>(deserializer: D) -> Result<Option<Os>, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    Os::from_name(&name).map(Some).ok_or_else(|| {
        de::Error::custom(format!(
            "unknown os '{name}', expected one of windows, linux, macos, other"
        ))
    })
}

impl RuleCondition {
    pub fn always() -> Self {
        Self::default()
    }

    pub fn os_is(os: Os) -> Self {
        Self {
            os: Some(os),
            ..Self::default()
        }
    }

    pub fn os_is_not(os: Os) -> Self {
        Self {
            not_os: Some(os),
            ..Self::default()
        }
    }

    pub fn is_always(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, platform: &PlatformDescriptor) -> Result<bool, ConfigError> {
        if let Some(os) = self.os {
            if platform.os != os {
                return Ok(false);
            }
        }
        if let Some(os) = self.not_os {
            if platform.os == os {
                return Ok(false);
            }
        }
        if !self.compiler.is_empty() {
            let compiler = platform.compiler()?;
            if !self.compiler.iter().any(|c| c == compiler) {
                return Ok(false);
            }
        }
        if let Some(arch) = &self.arch {
            if platform.architecture()? != arch.as_str() {
                return Ok(false);
            }
        }
        if let Some(build_type) = &self.build_type {
            if platform.build_type()? != build_type.as_str() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Platform settings this condition may read.
    pub fn settings_read(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.os.is_some() || self.not_os.is_some() {
            out.push(SETTING_OS);
        }
        if !self.compiler.is_empty() {
            out.push(SETTING_COMPILER);
        }
        if self.arch.is_some() {
            out.push(SETTING_ARCH);
        }
        if self.build_type.is_some() {
            out.push(SETTING_BUILD_TYPE);
        }
        out
    }
}

impl fmt::Display for RuleCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_always() {
            return f.write_str("always");
        }
        let mut parts = Vec::new();
        if let Some(os) = self.os {
            parts.push(format!("os == {os}"));
        }
        if let Some(os) = self.not_os {
            parts.push(format!("os != {os}"));
        }
        if !self.compiler.is_empty() {
            parts.push(format!("compiler in [{}]", self.compiler.join(", ")));
        }
        if let Some(arch) = &self.arch {
            parts.push(format!("arch == {arch}"));
        }
        if let Some(bt) = &self.build_type {
            parts.push(format!("build_type == {bt}"));
        }
        f.write_str(&parts.join(" && "))
    }
}

/// A single `dependency.key = value` assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Assignment {
    pub dependency: DependencyName,
    pub key: OptionKey,
    pub value: OptionValue,
}

impl Assignment {
    pub fn new(
        dependency: impl Into<DependencyName>,
        key: impl Into<OptionKey>,
        value: impl Into<OptionValue>,
    ) -> Self {
        Self {
            dependency: dependency.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Platform-conditioned, ordered set of option assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionOverrideRule {
    #[serde(default, rename = "when")]
    pub condition: RuleCondition,
    #[serde(default, rename = "set")]
    pub assignments: Vec<Assignment>,
}

impl OptionOverrideRule {
    pub fn new(condition: RuleCondition) -> Self {
        Self {
            condition,
            assignments: Vec::new(),
        }
    }

    #[must_use]
    pub fn assign(
        mut self,
        dependency: impl Into<DependencyName>,
        key: impl Into<OptionKey>,
        value: impl Into<OptionValue>,
    ) -> Self {
        self.assignments.push(Assignment::new(dependency, key, value));
        self
    }

    /// Apply this rule to `base`. Assignments land in declaration order, so a
    /// later assignment to the same key replaces an earlier one.
    pub fn apply(
        &self,
        mut base: OptionSet,
        platform: &PlatformDescriptor,
    ) -> Result<OptionSet, ConfigError> {
        if self.condition.matches(platform)? {
            for a in &self.assignments {
                base.set(a.dependency.clone(), a.key.clone(), a.value.clone());
            }
        }
        Ok(base)
    }
}
