use anyhow::{Context, Result};
use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct SchemaArgs {}

/// Print the JSON Schema of the report artifact for downstream consumers.
pub fn run(_args: &SchemaArgs) -> Result<()> {
    let schema = crate::report::report_schema_document();
    let encoded =
        serde_json::to_string_pretty(&schema).context("failed to encode report schema as JSON")?;
    println!("{encoded}");
    Ok(())
}
