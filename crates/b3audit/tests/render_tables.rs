use b3audit::report::table::{render_banner, render_report, render_section, render_section_table};
use b3audit::report::{AuditReport, ReportKind, ReportSection};

fn distribution_section() -> ReportSection {
    let mut section = ReportSection::new(
        "DISTRIBUTION BY SECURITY TYPE",
        &["ID", "Security Type", "Count", "Percentage"],
    );
    section.push_row(vec![
        "1".to_string(),
        "Equity".to_string(),
        "2".to_string(),
        "66.67".to_string(),
    ]);
    section.push_row(vec![
        "NULL".to_string(),
        "NULL/Unknown".to_string(),
        "1".to_string(),
        "33.33".to_string(),
    ]);
    section
}

#[test]
fn grid_table_layout_is_stable() {
    insta::assert_snapshot!(render_section_table(&distribution_section()), @r"
    +------+---------------+-------+------------+
    | ID   | Security Type | Count | Percentage |
    +======+===============+=======+============+
    | 1    | Equity        | 2     | 66.67      |
    +------+---------------+-------+------------+
    | NULL | NULL/Unknown  | 1     | 33.33      |
    +------+---------------+-------+------------+
    ");
}

#[test]
fn empty_sections_render_the_placeholder() {
    let section = ReportSection::new("UNMAPPED CATEGORIES", &["Market", "Category", "Count"]);
    insta::assert_snapshot!(render_section_table(&section), @"(no rows)");
}

#[test]
fn banner_wraps_the_report_title_in_eighty_column_rules() {
    let banner = render_banner(ReportKind::SecurityTypes);
    let lines = banner.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].len(), 80);
    assert!(lines[0].chars().all(|c| c == '='));
    assert_eq!(lines[1], "B3 SECURITY TYPE ID VALIDATION");
    assert_eq!(lines[0], lines[2]);
}

#[test]
fn sections_render_with_index_and_dashed_rule() {
    let section = ReportSection::new("UNMAPPED CATEGORIES", &["Market", "Category", "Count"]);
    let rendered = render_section(4, &section);
    let lines = rendered.lines().collect::<Vec<_>>();

    assert_eq!(lines[0], "4. UNMAPPED CATEGORIES:");
    assert_eq!(lines[1].len(), 80);
    assert!(lines[1].chars().all(|c| c == '-'));
    assert_eq!(lines[2], "(no rows)");
}

#[test]
fn full_report_numbers_sections_in_order() {
    let report = AuditReport::new(
        ReportKind::InstrumentNames,
        "2026-08-06T12:00:00Z".to_string(),
        "/tmp/instruments.db".to_string(),
        3,
        vec![
            distribution_section(),
            ReportSection::new("UNMAPPED CATEGORIES", &["Market", "Category", "Count"]),
        ],
    );

    let rendered = render_report(&report);

    assert!(rendered.starts_with(&"=".repeat(80)));
    assert!(rendered.contains("B3 INSTRUMENT NAME VALIDATION"));
    assert!(rendered.contains("\n\n1. DISTRIBUTION BY SECURITY TYPE:\n"));
    assert!(rendered.contains("\n\n2. UNMAPPED CATEGORIES:\n"));
    assert!(rendered.ends_with("(no rows)"));
}
