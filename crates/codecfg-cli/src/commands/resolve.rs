use super::{config_error, json_pretty, target_platform, PlatformArgs, DEFAULT_VARIANT, EXIT_SUCCESS};
use codecfg_core::{Config, ConflictPolicy, Resolver};
use codecfg_schema::{get_variant, parse_rule_table_file, BuiltinCatalog, OptionValue, RuleTable};
use std::path::Path;
use tracing::debug;

fn select_table(
    config: &Config,
    variant: Option<&str>,
    rules: Option<&Path>,
) -> Result<RuleTable, String> {
    if let Some(path) = rules {
        return parse_rule_table_file(path).map_err(config_error);
    }
    let name = variant
        .or(config.default_variant.as_deref())
        .unwrap_or(DEFAULT_VARIANT);
    get_variant(name)
        .ok_or_else(|| format!("configuration error: unknown variant '{name}'"))?
        .parse()
        .map_err(config_error)
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    config: &Config,
    variant: Option<&str>,
    rules: Option<&Path>,
    platform_args: &PlatformArgs,
    last_write_wins: bool,
    lock_path: Option<&Path>,
    json: bool,
) -> Result<u8, String> {
    let table = select_table(config, variant, rules)?;
    let platform = target_platform(config, platform_args)?;
    let policy = if last_write_wins {
        ConflictPolicy::LastWriteWins
    } else {
        config.conflict_policy
    };

    debug!("resolving table {} with {policy} conflict policy", table.name);

    let catalog = BuiltinCatalog::new();
    let resolution = Resolver::new(&catalog)
        .with_policy(policy)
        .resolve_table(&table, &platform)
        .map_err(|e| e.to_string())?;
    let lock = resolution.to_lock(&table);

    if let Some(path) = lock_path {
        lock.write_to_file(path)
            .map_err(|e| format!("failed to write lock {}: {e}", path.display()))?;
    }

    if json {
        println!("{}", json_pretty(&lock)?);
        return Ok(EXIT_SUCCESS);
    }

    println!("{} ({}) for {platform}", table.requires, table.name);
    if lock.options.is_empty() {
        println!("  no options set");
    }
    for (dep, key, value) in lock.options.iter() {
        let shown = match value {
            OptionValue::Bool(b) => super::colorize_bool(*b),
            OptionValue::Str(s) => format!("\"{s}\""),
        };
        println!("  {dep}.{key} = {shown}");
    }
    println!("config_id: {}", lock.short_id);
    if let Some(path) = lock_path {
        println!("lock written to {}", path.display());
    }
    Ok(EXIT_SUCCESS)
}
