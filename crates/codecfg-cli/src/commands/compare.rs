use super::{json_pretty, load_table, target_platform, PlatformArgs, EXIT_SUCCESS};
use codecfg_core::{compare_tables, Config, Resolver};
use codecfg_schema::BuiltinCatalog;

pub fn run(
    config: &Config,
    left: &str,
    right: &str,
    platform_args: &PlatformArgs,
    json: bool,
) -> Result<u8, String> {
    let left = load_table(left)?;
    let right = load_table(right)?;
    let platform = target_platform(config, platform_args)?;

    let catalog = BuiltinCatalog::new();
    let resolver = Resolver::new(&catalog).with_policy(config.conflict_policy);
    let report = compare_tables(&resolver, &left, &right, &platform).map_err(|e| e.to_string())?;

    if json {
        println!("{}", json_pretty(&report)?);
    } else if report.has_difference {
        println!("{} vs {} on {platform}:", report.left, report.right);
        for k in &report.only_left {
            println!("  - {k} (only in {})", report.left);
        }
        for k in &report.only_right {
            println!("  + {k} (only in {})", report.right);
        }
        for c in &report.changed {
            println!("  ~ {}: {} -> {}", c.key, c.left, c.right);
        }
    } else {
        println!(
            "{} and {} resolve identically on {platform}",
            report.left, report.right
        );
    }
    Ok(EXIT_SUCCESS)
}
