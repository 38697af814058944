use super::{json_pretty, EXIT_SUCCESS};
use codecfg_schema::{build_flags, parse_build_info_file};
use std::path::Path;

pub fn run(info: &Path, field: &str, prefix: &str, option: &str, json: bool) -> Result<u8, String> {
    let info = parse_build_info_file(info).map_err(|e| e.to_string())?;
    let flags = build_flags(&info, field, prefix, option);
    if json {
        let payload = serde_json::json!({ "field": field, "flags": flags });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("{flags}");
    }
    Ok(EXIT_SUCCESS)
}
