use crate::models::InstrumentRecord;
use crate::names::NameQualityAudit;
use crate::report::{AuditReport, ReportKind, ReportSection};
use crate::rules::{FUTURE_MARKET, SHARES_CATEGORY};

use super::{first_by_ticker, optional_text_cell, spot_check_records};

/// Fixed spot-check tickers; WINF26 replaces ABEVOF26 here, matching the
/// name-generation examples the enrichment job is checked against.
pub const SPOT_CHECK_TICKERS: &[&str] = &[
    "WDOF26", "PETR4", "A1MDA139", "BOVA11", "A1AP34", "WINF26",
];

pub const DEFAULT_TOP_CATEGORIES: usize = 10;
pub const DEFAULT_EXAMPLE_LIMIT: usize = 5;

const OPTION_CATEGORY_FRAGMENT: &str = "OPTION";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrumentNameAuditOptions {
    pub top_categories: usize,
    pub example_limit: usize,
}

impl Default for InstrumentNameAuditOptions {
    fn default() -> Self {
        Self {
            top_categories: DEFAULT_TOP_CATEGORIES,
            example_limit: DEFAULT_EXAMPLE_LIMIT,
        }
    }
}

/// Assemble the eight name-quality sections from an already-computed audit.
#[must_use]
pub fn build_report(
    records: &[InstrumentRecord],
    audit: &NameQualityAudit,
    db_path: &str,
    generated_at_utc: String,
    options: &InstrumentNameAuditOptions,
) -> AuditReport {
    let sections = vec![
        null_names_section(audit),
        unknown_usage_section(audit),
        category_samples_section(audit, options.top_categories),
        ticker_spot_checks_section(records),
        futures_examples_section(records, options.example_limit),
        options_examples_section(records, options.example_limit),
        shares_examples_section(records, options.example_limit),
        category_coverage_section(audit),
    ];

    AuditReport::new(
        ReportKind::InstrumentNames,
        generated_at_utc,
        db_path.to_string(),
        records.len(),
        sections,
    )
}

fn null_names_section(audit: &NameQualityAudit) -> ReportSection {
    let mut section = ReportSection::new(
        "NULL NAMES",
        &["Total Records", "Records With Names", "NULL Names"],
    );
    section.push_row(vec![
        audit.totals.total_records.to_string(),
        audit.totals.records_with_names.to_string(),
        audit.totals.null_names.to_string(),
    ]);
    section
}

fn unknown_usage_section(audit: &NameQualityAudit) -> ReportSection {
    let mut section =
        ReportSection::new("UNKNOWN NAME USAGE", &["Unknown Count", "Unknown Pct"]);
    section.push_row(vec![
        audit.unknown.unknown_count.to_string(),
        format!("{:.2}", audit.unknown.unknown_pct),
    ]);
    section
}

fn category_samples_section(audit: &NameQualityAudit, top_categories: usize) -> ReportSection {
    let mut section = ReportSection::new(
        "SAMPLE NAMES BY CATEGORY",
        &["Category", "Count", "Sample 1", "Sample 2"],
    );
    for samples in audit.category_samples.iter().take(top_categories) {
        section.push_row(vec![
            samples.category.clone(),
            samples.record_count.to_string(),
            optional_text_cell(samples.sample_1.as_deref()),
            optional_text_cell(samples.sample_2.as_deref()),
        ]);
    }
    section
}

fn ticker_spot_checks_section(records: &[InstrumentRecord]) -> ReportSection {
    let mut section = ReportSection::new(
        "TICKER SPOT CHECKS",
        &["Ticker", "Category", "Market", "Instrument Name"],
    );
    for record in spot_check_records(records, SPOT_CHECK_TICKERS) {
        section.push_row(vec![
            record.ticker.clone(),
            record.security_category_name.clone(),
            record.market_name.clone(),
            optional_text_cell(record.instrument_name.as_deref()),
        ]);
    }
    section
}

fn futures_examples_section(records: &[InstrumentRecord], example_limit: usize) -> ReportSection {
    let mut section = ReportSection::new(
        "FUTURES EXAMPLES",
        &["Ticker", "Category", "Instrument Name"],
    );
    for record in first_by_ticker(records, example_limit, |record| {
        record.market_name == FUTURE_MARKET
    }) {
        section.push_row(vec![
            record.ticker.clone(),
            record.security_category_name.clone(),
            optional_text_cell(record.instrument_name.as_deref()),
        ]);
    }
    section
}

fn options_examples_section(records: &[InstrumentRecord], example_limit: usize) -> ReportSection {
    let mut section = ReportSection::new(
        "OPTIONS EXAMPLES",
        &["Ticker", "Category", "Instrument Name"],
    );
    for record in first_by_ticker(records, example_limit, |record| {
        record
            .security_category_name
            .contains(OPTION_CATEGORY_FRAGMENT)
    }) {
        section.push_row(vec![
            record.ticker.clone(),
            record.security_category_name.clone(),
            optional_text_cell(record.instrument_name.as_deref()),
        ]);
    }
    section
}

fn shares_examples_section(records: &[InstrumentRecord], example_limit: usize) -> ReportSection {
    let mut section = ReportSection::new(
        "SHARES EXAMPLES",
        &["Ticker", "Instrument Name", "Company"],
    );
    for record in first_by_ticker(records, example_limit, |record| {
        record.security_category_name == SHARES_CATEGORY
    }) {
        section.push_row(vec![
            record.ticker.clone(),
            optional_text_cell(record.instrument_name.as_deref()),
            optional_text_cell(record.corporate_name.as_deref()),
        ]);
    }
    section
}

fn category_coverage_section(audit: &NameQualityAudit) -> ReportSection {
    let mut section = ReportSection::new(
        "NAME COVERAGE BY CATEGORY",
        &[
            "Category",
            "Count",
            "Named",
            "Named Pct",
            "Unknown",
            "Unknown Pct",
        ],
    );
    for coverage in &audit.category_coverage {
        section.push_row(vec![
            coverage.category.clone(),
            coverage.record_count.to_string(),
            coverage.named_count.to_string(),
            format!("{:.2}", coverage.named_pct),
            coverage.unknown_count.to_string(),
            format!("{:.2}", coverage.unknown_pct),
        ]);
    }
    section
}
