use super::{config_error, json_pretty, EXIT_SUCCESS};
use codecfg_schema::get_variant;

pub fn run(name: &str, json: bool) -> Result<u8, String> {
    let variant = get_variant(name)
        .ok_or_else(|| format!("configuration error: unknown variant '{name}'"))?;
    if json {
        let table = variant.parse().map_err(config_error)?;
        println!("{}", json_pretty(&table)?);
    } else {
        print!("{}", variant.table);
    }
    Ok(EXIT_SUCCESS)
}
