pub mod table;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::models::REPORT_SCHEMA_VERSION;

/// Every audit run emits exactly this many ordered sections.
pub const SECTIONS_PER_REPORT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    SecurityTypes,
    InstrumentNames,
}

#[must_use]
pub const fn report_kind_key(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::SecurityTypes => "security_types",
        ReportKind::InstrumentNames => "instrument_names",
    }
}

/// Ordered tuples of scalar fields with column headers. This is the whole
/// output contract between the audit builders and any renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportSection {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportSection {
    #[must_use]
    pub fn new(title: &str, headers: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            headers: headers.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuditReport {
    pub schema_version: String,
    pub report_kind: ReportKind,
    pub generated_at_utc: String,
    pub db_path: String,
    pub total_records: usize,
    pub sections: Vec<ReportSection>,
}

impl AuditReport {
    #[must_use]
    pub fn new(
        report_kind: ReportKind,
        generated_at_utc: String,
        db_path: String,
        total_records: usize,
        sections: Vec<ReportSection>,
    ) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            report_kind,
            generated_at_utc,
            db_path,
            total_records,
            sections,
        }
    }

    #[must_use]
    pub fn section_titles(&self) -> Vec<&str> {
        self.sections
            .iter()
            .map(|section| section.title.as_str())
            .collect()
    }
}

pub fn current_timestamp_utc() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("failed to format report timestamp")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifactLayout {
    pub report_json: PathBuf,
}

#[must_use]
pub fn build_artifact_layout(out_dir: &Path, kind: ReportKind) -> ReportArtifactLayout {
    ReportArtifactLayout {
        report_json: out_dir
            .join("reports")
            .join(format!("{}.json", report_kind_key(kind))),
    }
}

pub fn write_report_artifact(path: &Path, report: &AuditReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("failed to create report artifact directory")?;
    }

    let encoded = serde_json::to_vec_pretty(report).context("failed to encode report json")?;
    std::fs::write(path, encoded).context("failed to write report artifact")
}

#[must_use]
pub fn report_schema_document() -> Value {
    let schema = schemars::schema_for!(AuditReport);
    match serde_json::to_value(schema) {
        Ok(value) => value,
        Err(error) => {
            panic!("failed to serialize generated report schema: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ReportKind, ReportSection, build_artifact_layout, report_schema_document};
    use std::path::Path;

    #[test]
    fn artifact_paths_are_keyed_by_report_kind() {
        let layout = build_artifact_layout(Path::new("/tmp/out"), ReportKind::SecurityTypes);
        assert_eq!(
            layout.report_json,
            Path::new("/tmp/out/reports/security_types.json")
        );

        let layout = build_artifact_layout(Path::new("/tmp/out"), ReportKind::InstrumentNames);
        assert_eq!(
            layout.report_json,
            Path::new("/tmp/out/reports/instrument_names.json")
        );
    }

    #[test]
    fn schema_document_describes_the_report_envelope() {
        let schema = report_schema_document();
        let properties = schema
            .get("properties")
            .and_then(|value| value.as_object())
            .expect("schema should expose properties");

        for field in [
            "schema_version",
            "report_kind",
            "generated_at_utc",
            "db_path",
            "total_records",
            "sections",
        ] {
            assert!(properties.contains_key(field), "missing field: {field}");
        }
    }

    #[test]
    fn section_rows_append_in_order() {
        let mut section = ReportSection::new("EXAMPLE", &["A", "B"]);
        section.push_row(vec!["1".to_string(), "2".to_string()]);
        section.push_row(vec!["3".to_string(), "4".to_string()]);

        assert_eq!(section.headers, vec!["A", "B"]);
        assert_eq!(section.rows[0], vec!["1", "2"]);
        assert_eq!(section.rows[1], vec!["3", "4"]);
    }
}
