use anyhow::Result;
use yeti_build_core::configs::project::ProjectConfig;

pub fn execute() -> Result<()> {
    let schema = schemars::schema_for!(ProjectConfig);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
