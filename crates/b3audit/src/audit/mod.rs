pub mod instrument_names;
pub mod security_types;

use crate::models::InstrumentRecord;

/// NULL cells render as the literal `NULL`, the way the source table's
/// absent values read in the original diagnostics.
pub(crate) const NULL_CELL: &str = "NULL";

pub(crate) fn optional_text_cell(value: Option<&str>) -> String {
    value.map_or_else(|| NULL_CELL.to_string(), ToString::to_string)
}

pub(crate) fn optional_code_cell(value: Option<i64>) -> String {
    value.map_or_else(|| NULL_CELL.to_string(), |code| code.to_string())
}

pub(crate) fn spot_check_records<'records>(
    records: &'records [InstrumentRecord],
    tickers: &[&str],
) -> Vec<&'records InstrumentRecord> {
    let mut selected = records
        .iter()
        .filter(|record| tickers.contains(&record.ticker.as_str()))
        .collect::<Vec<_>>();
    selected.sort_by(|left, right| left.ticker.cmp(&right.ticker));
    selected
}

pub(crate) fn first_by_ticker<'records>(
    records: &'records [InstrumentRecord],
    limit: usize,
    keep: impl Fn(&InstrumentRecord) -> bool,
) -> Vec<&'records InstrumentRecord> {
    let mut selected = records.iter().filter(|record| keep(record)).collect::<Vec<_>>();
    selected.sort_by(|left, right| left.ticker.cmp(&right.ticker));
    selected.truncate(limit);
    selected
}
