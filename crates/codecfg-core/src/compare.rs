use crate::resolver::Resolver;
use crate::CoreError;
use codecfg_schema::{OptionValue, PlatformDescriptor, RuleTable};
use serde::Serialize;

/// An option both tables set, to different values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueChange {
    pub key: String,
    pub left: OptionValue,
    pub right: OptionValue,
}

/// Differences between two rule tables resolved for the same platform.
#[derive(Debug, Clone, Serialize)]
pub struct TableComparison {
    pub left: String,
    pub right: String,
    pub platform: PlatformDescriptor,
    pub only_left: Vec<String>,
    pub only_right: Vec<String>,
    pub changed: Vec<ValueChange>,
    pub has_difference: bool,
}

/// Resolve both tables for `platform` and report every option that differs.
pub fn compare_tables(
    resolver: &Resolver<'_>,
    left: &RuleTable,
    right: &RuleTable,
    platform: &PlatformDescriptor,
) -> Result<TableComparison, CoreError> {
    let l = resolver.resolve_table(left, platform)?.options;
    let r = resolver.resolve_table(right, platform)?.options;

    let mut only_left = Vec::new();
    let mut changed = Vec::new();
    for (dep, key, value) in l.iter() {
        match r.get(dep, key) {
            None => only_left.push(format!("{dep}.{key}")),
            Some(other) if other != value => changed.push(ValueChange {
                key: format!("{dep}.{key}"),
                left: value.clone(),
                right: other.clone(),
            }),
            Some(_) => {}
        }
    }
    let only_right: Vec<String> = r
        .iter()
        .filter(|(dep, key, _)| !l.contains(dep, key))
        .map(|(dep, key, _)| format!("{dep}.{key}"))
        .collect();

    let has_difference = !only_left.is_empty() || !only_right.is_empty() || !changed.is_empty();

    Ok(TableComparison {
        left: left.name.clone(),
        right: right.name.clone(),
        platform: platform.clone(),
        only_left,
        only_right,
        changed,
        has_difference,
    })
}
