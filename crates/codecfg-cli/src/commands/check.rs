use super::{config_error, json_pretty, EXIT_SUCCESS};
use codecfg_core::Resolver;
use codecfg_schema::{parse_rule_table_file, BuiltinCatalog, ConfigError, OptionCatalog};
use std::path::Path;

pub fn run(file: &Path, json: bool) -> Result<u8, String> {
    let table = parse_rule_table_file(file).map_err(config_error)?;
    table.validate().map_err(config_error)?;

    let catalog = BuiltinCatalog::new();
    if catalog.schema(&table.dependency).is_none() {
        return Err(config_error(ConfigError::UnknownDependency(
            table.dependency.to_string(),
        )));
    }
    Resolver::new(&catalog)
        .validate_rules(&table.rules)
        .map_err(|e| e.to_string())?;

    if json {
        let payload = serde_json::json!({
            "file": file.display().to_string(),
            "name": table.name,
            "dependency": table.dependency,
            "rules": table.rules.len(),
            "valid": true,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "{}: rule table '{}' for {} is valid ({} rules)",
            file.display(),
            table.name,
            table.requires,
            table.rules.len()
        );
    }
    Ok(EXIT_SUCCESS)
}
