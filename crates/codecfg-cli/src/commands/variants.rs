use super::{json_pretty, EXIT_SUCCESS};
use codecfg_schema::list_variants;

pub fn run(json: bool) -> Result<u8, String> {
    let variants = list_variants();
    if json {
        let payload: Vec<_> = variants
            .iter()
            .map(|v| {
                serde_json::json!({
                    "name": v.name,
                    "description": v.description,
                })
            })
            .collect();
        println!("{}", json_pretty(&payload)?);
    } else {
        for v in variants {
            println!("{:<4} {}", v.name, v.description);
        }
    }
    Ok(EXIT_SUCCESS)
}
