use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};

use crate::models::InstrumentRecord;

pub const INSTRUMENTS_TABLE: &str = "b3_instruments_enriched";

pub const TICKER_COLUMN: &str = "TckrSymb";
pub const MARKET_COLUMN: &str = "MktNm";
pub const CATEGORY_COLUMN: &str = "SctyCtgyNm";
pub const CORPORATE_COLUMN: &str = "CrpnNm";
pub const NAME_COLUMN: &str = "instrument_name";
pub const TYPE_COLUMN: &str = "securityTypeId";

// The mixed-case upstream column names must stay quoted; `instrument_name`
// and `securityTypeId` were added by the enrichment job and are not.
const CREATE_INSTRUMENTS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS b3_instruments_enriched (
    "TckrSymb" TEXT NOT NULL PRIMARY KEY,
    "MktNm" TEXT NOT NULL,
    "SctyCtgyNm" TEXT NOT NULL,
    "CrpnNm" TEXT,
    instrument_name TEXT,
    securityTypeId INTEGER
);
"#;

/// DDL for the audited table, exposed so fixtures build exactly the shape
/// `load_instruments` reads. The audit binary itself never executes it.
#[must_use]
pub fn instruments_schema_sql() -> &'static str {
    CREATE_INSTRUMENTS_TABLE_SQL
}

/// Open the instruments database as a scoped read-only handle. The handle is
/// passed down explicitly and released when it drops; the binary never holds
/// a process-wide connection.
pub fn open_readonly_connection(path: &Path) -> Result<Connection> {
    Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY).with_context(|| {
        format!(
            "failed to open instruments database read-only: {}",
            path.display()
        )
    })
}

/// Load the full snapshot, ordered by ticker for deterministic reports.
/// A missing table or column fails the run here; schema drift is fatal.
pub fn load_instruments(connection: &Connection) -> Result<Vec<InstrumentRecord>> {
    let query = format!(
        "SELECT \"{TICKER_COLUMN}\", \"{MARKET_COLUMN}\", \"{CATEGORY_COLUMN}\", \
         \"{CORPORATE_COLUMN}\", {NAME_COLUMN}, {TYPE_COLUMN} \
         FROM {INSTRUMENTS_TABLE} ORDER BY \"{TICKER_COLUMN}\""
    );

    let mut statement = connection
        .prepare(&query)
        .context("failed to prepare instruments snapshot query")?;
    let rows = statement
        .query_map([], |row| {
            Ok(InstrumentRecord {
                ticker: row.get(0)?,
                market_name: row.get(1)?,
                security_category_name: row.get(2)?,
                corporate_name: row.get(3)?,
                instrument_name: row.get(4)?,
                security_type_id: row.get(5)?,
            })
        })
        .context("failed to query instruments table")?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row.context("failed to decode instrument row")?);
    }

    Ok(records)
}
