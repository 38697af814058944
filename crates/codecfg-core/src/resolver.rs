use crate::CoreError;
use codecfg_schema::{
    ConfigError, DependencyName, OptionCatalog, OptionKey, OptionOverrideRule, OptionSet,
    OptionValue, PlatformDescriptor, ResolvedConfig, RuleTable,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, trace, warn};

/// What happens when two rules assign different values to the same option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Fail the resolution with [`CoreError::Conflict`].
    #[default]
    Strict,
    /// Keep the later rule's value and log a warning.
    LastWriteWins,
}

impl ConflictPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictPolicy::Strict => "strict",
            ConflictPolicy::LastWriteWins => "last-write-wins",
        }
    }
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "strict" => Ok(ConflictPolicy::Strict),
            "last-write-wins" => Ok(ConflictPolicy::LastWriteWins),
            other => Err(format!(
                "unknown conflict policy '{other}', expected strict or last-write-wins"
            )),
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of resolving one dependency node for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub dependency: DependencyName,
    pub platform: PlatformDescriptor,
    pub options: OptionSet,
    /// Indices of the rules whose condition held, in fold order.
    pub applied_rules: Vec<usize>,
}

impl Resolution {
    pub fn to_lock(&self, table: &RuleTable) -> ResolvedConfig {
        ResolvedConfig::new(
            self.dependency.clone(),
            &table.requires,
            &table.name,
            self.platform.clone(),
            self.options.clone(),
        )
    }
}

/// Folds platform-conditioned rules into a validated option set.
///
/// The resolver holds no mutable state; one instance can serve any number of
/// concurrent resolutions.
pub struct Resolver<'c> {
    catalog: &'c dyn OptionCatalog,
    policy: ConflictPolicy,
}

impl<'c> Resolver<'c> {
    pub fn new(catalog: &'c dyn OptionCatalog) -> Self {
        Self {
            catalog,
            policy: ConflictPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    pub fn resolve(
        &self,
        dependency: &str,
        platform: &PlatformDescriptor,
        rules: &[OptionOverrideRule],
    ) -> Result<Resolution, CoreError> {
        self.resolve_with_base(dependency, platform, rules, OptionSet::new())
    }

    /// Resolve starting from a caller-supplied base set. Rules may override
    /// base values without that counting as a conflict.
    pub fn resolve_with_base(
        &self,
        dependency: &str,
        platform: &PlatformDescriptor,
        rules: &[OptionOverrideRule],
        base: OptionSet,
    ) -> Result<Resolution, CoreError> {
        let dependency = dependency.trim();
        if self.catalog.schema(dependency).is_none() {
            return Err(ConfigError::UnknownDependency(dependency.to_owned()).into());
        }
        for (dep, key, value) in base.iter() {
            self.catalog.validate(dep, key, value)?;
        }
        // Every rule is checked, including ones that will not apply to this
        // platform, so a typo fails on all targets alike.
        self.validate_rules(rules)?;

        let mut options = base;
        let mut origins: BTreeMap<(DependencyName, OptionKey), (usize, OptionValue)> =
            BTreeMap::new();
        let mut applied_rules = Vec::new();

        for (idx, rule) in rules.iter().enumerate() {
            if !rule.condition.matches(platform)? {
                trace!("rule {idx} ({}) skipped", rule.condition);
                continue;
            }
            debug!("rule {idx} ({}) applies", rule.condition);
            applied_rules.push(idx);

            let assigned = rule.apply(OptionSet::new(), platform)?;
            for (dep, key, value) in assigned.iter() {
                let slot = (dep.clone(), key.clone());
                if let Some((first_rule, first)) = origins.get(&slot) {
                    if first != value {
                        match self.policy {
                            ConflictPolicy::Strict => {
                                return Err(CoreError::Conflict {
                                    dependency: dep.to_string(),
                                    key: key.to_string(),
                                    first: first.clone(),
                                    second: value.clone(),
                                    first_rule: *first_rule,
                                    second_rule: idx,
                                });
                            }
                            ConflictPolicy::LastWriteWins => warn!(
                                "rule {idx} overrides {dep}.{key} = {first} from rule {first_rule} with {value}"
                            ),
                        }
                    }
                }
                origins.insert(slot, (idx, value.clone()));
                options.set(dep.clone(), key.clone(), value.clone());
            }
        }

        info!(
            "resolved {} option(s) for {dependency} on {platform} ({} of {} rules applied)",
            options.len(),
            applied_rules.len(),
            rules.len()
        );

        Ok(Resolution {
            dependency: DependencyName::new(dependency),
            platform: platform.clone(),
            options,
            applied_rules,
        })
    }

    /// Validate the table structure, then resolve its dependency with its rules.
    pub fn resolve_table(
        &self,
        table: &RuleTable,
        platform: &PlatformDescriptor,
    ) -> Result<Resolution, CoreError> {
        table.validate()?;
        self.resolve(&table.dependency, platform, &table.rules)
    }

    /// Check every assignment of every rule against the catalog.
    pub fn validate_rules(&self, rules: &[OptionOverrideRule]) -> Result<(), CoreError> {
        for rule in rules {
            for a in &rule.assignments {
                self.catalog.validate(&a.dependency, &a.key, &a.value)?;
            }
        }
        Ok(())
    }
}
