use anyhow::{Context, Result};
use clap::Args;

use crate::audit::instrument_names::{
    DEFAULT_EXAMPLE_LIMIT, DEFAULT_TOP_CATEGORIES, InstrumentNameAuditOptions, build_report,
};
use crate::config::RuntimePaths;
use crate::report::{ReportKind, table};

#[derive(Debug, Clone, Args)]
pub struct NamesArgs {
    #[arg(long, default_value_t = DEFAULT_TOP_CATEGORIES, value_name = "N")]
    pub top_categories: usize,

    #[arg(long, default_value_t = DEFAULT_EXAMPLE_LIMIT, value_name = "N")]
    pub example_limit: usize,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: &NamesArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    println!(
        "names: start top_categories={} example_limit={} db={} out_dir={}",
        args.top_categories,
        args.example_limit,
        runtime_paths.db_path.display(),
        runtime_paths.out_dir.display()
    );

    let connection = crate::sqlite::open_readonly_connection(&runtime_paths.db_path)?;
    let records = crate::sqlite::load_instruments(&connection)?;

    let audit = crate::names::audit_names(&records);
    let report = build_report(
        &records,
        &audit,
        &runtime_paths.db_path.to_string_lossy(),
        crate::report::current_timestamp_utc()?,
        &InstrumentNameAuditOptions {
            top_categories: args.top_categories,
            example_limit: args.example_limit,
        },
    );

    let artifacts =
        crate::report::build_artifact_layout(&runtime_paths.out_dir, ReportKind::InstrumentNames);
    crate::report::write_report_artifact(&artifacts.report_json, &report)?;

    if args.json {
        let encoded = serde_json::to_string_pretty(&report)
            .context("failed to encode instrument-name report as JSON")?;
        println!("{encoded}");
    } else {
        println!("{}", table::render_report(&report));
    }

    println!(
        "names: report records={} null_names={} unknown_names={} report={}",
        records.len(),
        audit.totals.null_names,
        audit.unknown.unknown_count,
        artifacts.report_json.display()
    );

    Ok(())
}
