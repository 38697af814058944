use super::{json_pretty, target_platform, PlatformArgs, EXIT_FAILURE, EXIT_SUCCESS};
use codecfg_core::Config;
use codecfg_schema::ResolvedConfig;
use std::path::Path;
use tracing::debug;

pub fn run(
    config: &Config,
    lock_path: &Path,
    current_platform: bool,
    platform_args: &PlatformArgs,
    json: bool,
) -> Result<u8, String> {
    let lock = ResolvedConfig::read_from_file(lock_path)
        .map_err(|e| format!("failed to read lock {}: {e}", lock_path.display()))?;

    debug!("verifying lock {} ({})", lock_path.display(), lock.short_id);

    let mut problems = Vec::new();
    if let Err(e) = lock.verify_integrity() {
        problems.push(e.to_string());
    }
    if current_platform {
        let platform = target_platform(config, platform_args)?;
        if let Err(e) = lock.verify_platform(&platform) {
            problems.push(e.to_string());
        }
    }

    if json {
        let payload = serde_json::json!({
            "lock": lock_path.display().to_string(),
            "config_id": lock.config_id,
            "short_id": lock.short_id,
            "valid": problems.is_empty(),
            "problems": problems,
        });
        println!("{}", json_pretty(&payload)?);
    } else if problems.is_empty() {
        println!(
            "{}: {} for {} verified ({})",
            lock_path.display(),
            lock.requires,
            lock.platform,
            lock.short_id
        );
    } else {
        println!("{}: verification failed", lock_path.display());
        for p in &problems {
            println!("  FAIL {p}");
        }
    }

    if problems.is_empty() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILURE)
    }
}
