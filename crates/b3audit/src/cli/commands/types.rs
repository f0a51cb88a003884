use anyhow::{Context, Result};
use clap::Args;

use crate::audit::security_types::{
    DEFAULT_MISMATCH_LIMIT, SecurityTypeAuditOptions, build_report,
};
use crate::config::RuntimePaths;
use crate::report::{ReportKind, table};
use crate::rules::{self, rule_key_name};

#[derive(Debug, Clone, Args)]
pub struct TypesArgs {
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    #[arg(long, default_value_t = DEFAULT_MISMATCH_LIMIT, value_name = "N")]
    pub mismatch_limit: usize,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug)]
pub struct StrictAuditFailure {
    pub mismatched_records: usize,
    pub first_rule: Option<String>,
}

impl std::fmt::Display for StrictAuditFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "strict audit failed with {} mismatched record(s).",
            self.mismatched_records
        )?;
        if let Some(rule) = &self.first_rule {
            write!(f, " first failing rule: {rule}")?;
        }
        Ok(())
    }
}

impl std::error::Error for StrictAuditFailure {}

pub fn run(args: &TypesArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    println!(
        "types: start strict={} db={} out_dir={}",
        args.strict,
        runtime_paths.db_path.display(),
        runtime_paths.out_dir.display()
    );

    let connection = crate::sqlite::open_readonly_connection(&runtime_paths.db_path)?;
    let records = crate::sqlite::load_instruments(&connection)?;

    let conformance = rules::evaluate_rules(&records);
    let report = build_report(
        &records,
        &conformance,
        &runtime_paths.db_path.to_string_lossy(),
        crate::report::current_timestamp_utc()?,
        &SecurityTypeAuditOptions {
            mismatch_limit: args.mismatch_limit,
        },
    );

    let artifacts =
        crate::report::build_artifact_layout(&runtime_paths.out_dir, ReportKind::SecurityTypes);
    crate::report::write_report_artifact(&artifacts.report_json, &report)?;

    if args.json {
        let encoded = serde_json::to_string_pretty(&report)
            .context("failed to encode security-type report as JSON")?;
        println!("{encoded}");
    } else {
        println!("{}", table::render_report(&report));
    }

    let mismatched_records = conformance
        .iter()
        .map(|outcome| outcome.mismatches.len())
        .sum::<usize>();
    println!(
        "types: report records={} mismatched={} report={}",
        records.len(),
        mismatched_records,
        artifacts.report_json.display()
    );

    if args.strict && mismatched_records > 0 {
        eprintln!("types: strict gate failed mismatched={mismatched_records} next=inspect_report");
        let first_rule = conformance
            .iter()
            .find(|outcome| !outcome.mismatches.is_empty())
            .map(|outcome| rule_key_name(outcome.key).to_string());
        return Err(StrictAuditFailure {
            mismatched_records,
            first_rule,
        }
        .into());
    }

    Ok(())
}
