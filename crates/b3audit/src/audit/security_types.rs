use std::collections::BTreeMap;

use crate::models::{InstrumentRecord, SecurityType, label_for_code};
use crate::names::percentage;
use crate::report::{AuditReport, ReportKind, ReportSection};
use crate::rules::{RuleConformance, rule_catalog, rule_key_name};

use super::{optional_code_cell, optional_text_cell, spot_check_records};

/// Fixed spot-check tickers covering one instrument per major category.
pub const SPOT_CHECK_TICKERS: &[&str] = &[
    "PETR4", "WDOF26", "A1MDA139", "BOVA11", "A1AP34", "ABEVOF26",
];

pub const UNMAPPED_CATEGORY_LIMIT: usize = 10;
pub const DEFAULT_MISMATCH_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityTypeAuditOptions {
    /// Example mismatches listed per rule in the RULE MISMATCHES section.
    pub mismatch_limit: usize,
}

impl Default for SecurityTypeAuditOptions {
    fn default() -> Self {
        Self {
            mismatch_limit: DEFAULT_MISMATCH_LIMIT,
        }
    }
}

/// Assemble the eight security-type sections from an already-evaluated rule
/// pass. Pure over its inputs; the caller decides what to do with mismatch
/// counts (report only, or gate the exit code in strict mode).
#[must_use]
pub fn build_report(
    records: &[InstrumentRecord],
    conformance: &[RuleConformance],
    db_path: &str,
    generated_at_utc: String,
    options: &SecurityTypeAuditOptions,
) -> AuditReport {
    let sections = vec![
        null_security_types_section(records),
        distribution_section(records),
        sample_records_section(records),
        unmapped_categories_section(records),
        rule_conformance_section(conformance),
        rule_mismatches_section(conformance, options.mismatch_limit),
        funds_breakdown_section(records),
        catalog_section(),
    ];

    AuditReport::new(
        ReportKind::SecurityTypes,
        generated_at_utc,
        db_path.to_string(),
        records.len(),
        sections,
    )
}

fn null_security_types_section(records: &[InstrumentRecord]) -> ReportSection {
    let total = records.len();
    let null_count = records
        .iter()
        .filter(|record| record.security_type_id.is_none())
        .count();

    let mut section = ReportSection::new(
        "NULL SECURITY TYPES",
        &["Total Records", "Classified", "NULL Count", "NULL Pct"],
    );
    section.push_row(vec![
        total.to_string(),
        (total - null_count).to_string(),
        null_count.to_string(),
        format!("{:.2}", percentage(null_count, total)),
    ]);
    section
}

fn distribution_section(records: &[InstrumentRecord]) -> ReportSection {
    let mut counts = BTreeMap::<Option<i64>, usize>::new();
    for record in records {
        *counts.entry(record.security_type_id).or_insert(0) += 1;
    }

    let mut entries = counts.into_iter().collect::<Vec<_>>();
    entries.sort_by(|left, right| {
        right
            .1
            .cmp(&left.1)
            .then_with(|| distribution_rank(left.0).cmp(&distribution_rank(right.0)))
    });

    let mut section = ReportSection::new(
        "DISTRIBUTION BY SECURITY TYPE",
        &["ID", "Security Type", "Count", "Percentage"],
    );
    for (code, count) in entries {
        section.push_row(vec![
            optional_code_cell(code),
            label_for_code(code).to_string(),
            count.to_string(),
            format!("{:.2}", percentage(count, records.len())),
        ]);
    }
    section
}

// NULL sorts after every concrete code among equal counts.
const fn distribution_rank(code: Option<i64>) -> i64 {
    match code {
        Some(code) => code,
        None => i64::MAX,
    }
}

fn sample_records_section(records: &[InstrumentRecord]) -> ReportSection {
    let mut section = ReportSection::new(
        "SAMPLE RECORDS",
        &[
            "Ticker",
            "Market",
            "Category",
            "Instrument Name",
            "Type ID",
            "Type Name",
        ],
    );
    for record in spot_check_records(records, SPOT_CHECK_TICKERS) {
        section.push_row(vec![
            record.ticker.clone(),
            record.market_name.clone(),
            record.security_category_name.clone(),
            optional_text_cell(record.instrument_name.as_deref()),
            optional_code_cell(record.security_type_id),
            label_for_code(record.security_type_id).to_string(),
        ]);
    }
    section
}

fn unmapped_categories_section(records: &[InstrumentRecord]) -> ReportSection {
    let mut counts = BTreeMap::<(&str, &str), usize>::new();
    for record in records {
        if record.security_type_id.is_none() {
            *counts
                .entry((
                    record.market_name.as_str(),
                    record.security_category_name.as_str(),
                ))
                .or_insert(0) += 1;
        }
    }

    let mut entries = counts.into_iter().collect::<Vec<_>>();
    entries.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(&right.0)));
    entries.truncate(UNMAPPED_CATEGORY_LIMIT);

    let mut section =
        ReportSection::new("UNMAPPED CATEGORIES", &["Market", "Category", "Count"]);
    for ((market, category), count) in entries {
        section.push_row(vec![
            market.to_string(),
            category.to_string(),
            count.to_string(),
        ]);
    }
    section
}

fn rule_conformance_section(conformance: &[RuleConformance]) -> ReportSection {
    let mut section = ReportSection::new(
        "RULE CONFORMANCE",
        &[
            "Rule",
            "Condition",
            "Expected",
            "Matched",
            "Conformant",
            "Mismatched",
        ],
    );
    for (rule, outcome) in rule_catalog().iter().zip(conformance) {
        section.push_row(vec![
            rule_key_name(outcome.key).to_string(),
            rule.summary.to_string(),
            rule.expected_labels(),
            outcome.matched_records.to_string(),
            outcome.conformant_records.to_string(),
            outcome.mismatches.len().to_string(),
        ]);
    }
    section
}

fn rule_mismatches_section(conformance: &[RuleConformance], mismatch_limit: usize) -> ReportSection {
    let mut section = ReportSection::new(
        "RULE MISMATCHES",
        &["Rule", "Ticker", "Market", "Category", "Expected", "Actual"],
    );
    for outcome in conformance {
        let expected = outcome
            .expected
            .iter()
            .map(|security_type| security_type.label())
            .collect::<Vec<_>>()
            .join(" or ");
        for mismatch in outcome.mismatches.iter().take(mismatch_limit) {
            section.push_row(vec![
                rule_key_name(outcome.key).to_string(),
                mismatch.ticker.clone(),
                mismatch.market_name.clone(),
                mismatch.security_category_name.clone(),
                expected.clone(),
                optional_code_cell(mismatch.actual_security_type_id),
            ]);
        }
    }
    section
}

fn funds_breakdown_section(records: &[InstrumentRecord]) -> ReportSection {
    let funds = records
        .iter()
        .filter(|record| record.security_category_name == crate::rules::FUNDS_CATEGORY)
        .collect::<Vec<_>>();
    let reit_named = funds
        .iter()
        .filter(|record| {
            record
                .corporate_name
                .as_deref()
                .is_some_and(crate::rules::is_reit_corporate_name)
        })
        .count();
    let coded_reit = funds
        .iter()
        .filter(|record| record.security_type_id == Some(SecurityType::Reit.code()))
        .count();
    let coded_fund = funds
        .iter()
        .filter(|record| record.security_type_id == Some(SecurityType::Fund.code()))
        .count();

    let mut section = ReportSection::new("FUNDS BREAKDOWN", &["Metric", "Count"]);
    for (metric, count) in [
        ("FUNDS records", funds.len()),
        ("REIT corporate names (IMOB/FII)", reit_named),
        ("Coded REIT (7)", coded_reit),
        ("Coded Fund (14)", coded_fund),
        (
            "Other or NULL codes",
            funds.len() - coded_reit - coded_fund,
        ),
    ] {
        section.push_row(vec![metric.to_string(), count.to_string()]);
    }
    section
}

fn catalog_section() -> ReportSection {
    let mut section = ReportSection::new("SECURITY TYPE CATALOG", &["ID", "Label"]);
    for security_type in SecurityType::ALL {
        section.push_row(vec![
            security_type.code().to_string(),
            security_type.label().to_string(),
        ]);
    }
    section
}
