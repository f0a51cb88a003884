use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::InstrumentRecord;

/// Literal prefix the name generator falls back to when it cannot derive a
/// real instrument name.
pub const UNKNOWN_NAME_PREFIX: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NameTotals {
    pub total_records: usize,
    pub records_with_names: usize,
    pub null_names: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UnknownNameUsage {
    pub unknown_count: usize,
    pub unknown_pct: f64,
}

/// Two spot-check samples per category, taken from the lexicographically
/// first records by ticker. A sample slot carries that record's name, which
/// may itself be NULL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryNameSamples {
    pub category: String,
    pub record_count: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_1: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_2: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryNameCoverage {
    pub category: String,
    pub record_count: usize,
    pub named_count: usize,
    pub named_pct: f64,
    pub unknown_count: usize,
    pub unknown_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NameQualityAudit {
    pub totals: NameTotals,
    pub unknown: UnknownNameUsage,
    /// All categories with at least one record, largest first.
    pub category_samples: Vec<CategoryNameSamples>,
    /// All categories with at least one record, alphabetical.
    pub category_coverage: Vec<CategoryNameCoverage>,
}

#[must_use]
pub fn is_unknown_name(name: &str) -> bool {
    name.starts_with(UNKNOWN_NAME_PREFIX)
}

/// Percentage rounded to two decimals; an empty denominator yields 0.00.
#[must_use]
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    ((part as f64) * 10_000.0 / (total as f64)).round() / 100.0
}

/// Pure aggregation over an immutable snapshot: same records in, same
/// aggregates out.
#[must_use]
pub fn audit_names(records: &[InstrumentRecord]) -> NameQualityAudit {
    let total_records = records.len();
    let records_with_names = records
        .iter()
        .filter(|record| record.instrument_name.is_some())
        .count();
    let unknown_count = records
        .iter()
        .filter(|record| {
            record
                .instrument_name
                .as_deref()
                .is_some_and(is_unknown_name)
        })
        .count();

    let mut grouped = BTreeMap::<&str, Vec<&InstrumentRecord>>::new();
    for record in records {
        grouped
            .entry(record.security_category_name.as_str())
            .or_default()
            .push(record);
    }

    let mut category_samples = Vec::new();
    let mut category_coverage = Vec::new();
    for (category, mut members) in grouped {
        members.sort_by(|left, right| left.ticker.cmp(&right.ticker));

        let named_count = members
            .iter()
            .filter(|record| record.instrument_name.is_some())
            .count();
        let category_unknown_count = members
            .iter()
            .filter(|record| {
                record
                    .instrument_name
                    .as_deref()
                    .is_some_and(is_unknown_name)
            })
            .count();

        category_samples.push(CategoryNameSamples {
            category: category.to_string(),
            record_count: members.len(),
            sample_1: members.first().and_then(|record| record.instrument_name.clone()),
            sample_2: members.get(1).and_then(|record| record.instrument_name.clone()),
        });
        category_coverage.push(CategoryNameCoverage {
            category: category.to_string(),
            record_count: members.len(),
            named_count,
            named_pct: percentage(named_count, members.len()),
            unknown_count: category_unknown_count,
            unknown_pct: percentage(category_unknown_count, members.len()),
        });
    }

    category_samples.sort_by(|left, right| {
        right
            .record_count
            .cmp(&left.record_count)
            .then_with(|| left.category.cmp(&right.category))
    });

    NameQualityAudit {
        totals: NameTotals {
            total_records,
            records_with_names,
            null_names: total_records - records_with_names,
        },
        unknown: UnknownNameUsage {
            unknown_count,
            unknown_pct: percentage(unknown_count, total_records),
        },
        category_samples,
        category_coverage,
    }
}
