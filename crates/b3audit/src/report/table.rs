use super::{AuditReport, ReportKind, ReportSection};

const RULE_WIDTH: usize = 80;
const EMPTY_SECTION_PLACEHOLDER: &str = "(no rows)";

/// Render the whole report as sectioned grid tables for stdout. The audit
/// builders never format; everything they emit arrives here as plain rows.
#[must_use]
pub fn render_report(report: &AuditReport) -> String {
    let mut blocks = vec![render_banner(report.report_kind)];
    for (index, section) in report.sections.iter().enumerate() {
        blocks.push(render_section(index + 1, section));
    }

    blocks.join("\n\n")
}

#[must_use]
pub fn render_banner(kind: ReportKind) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\n{}\n{rule}", banner_title(kind))
}

#[must_use]
pub const fn banner_title(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::SecurityTypes => "B3 SECURITY TYPE ID VALIDATION",
        ReportKind::InstrumentNames => "B3 INSTRUMENT NAME VALIDATION",
    }
}

#[must_use]
pub fn render_section(index: usize, section: &ReportSection) -> String {
    format!(
        "{index}. {}:\n{}\n{}",
        section.title,
        "-".repeat(RULE_WIDTH),
        render_section_table(section)
    )
}

/// Grid table: dashed borders, a `=` rule under the header, one border per
/// data row.
#[must_use]
pub fn render_section_table(section: &ReportSection) -> String {
    if section.rows.is_empty() {
        return EMPTY_SECTION_PLACEHOLDER.to_string();
    }

    let widths = column_widths(section);
    let dashed_border = border(&widths, '-');
    let header_border = border(&widths, '=');

    let mut lines = vec![
        dashed_border.clone(),
        render_cells(&section.headers, &widths),
        header_border,
    ];
    for row in &section.rows {
        lines.push(render_cells(row, &widths));
        lines.push(dashed_border.clone());
    }

    lines.join("\n")
}

fn column_widths(section: &ReportSection) -> Vec<usize> {
    let column_count = section
        .rows
        .iter()
        .map(Vec::len)
        .chain([section.headers.len()])
        .max()
        .unwrap_or(0);

    let mut widths = vec![0usize; column_count];
    for (index, header) in section.headers.iter().enumerate() {
        widths[index] = widths[index].max(display_width(header));
    }
    for row in &section.rows {
        for (index, cell) in row.iter().enumerate() {
            widths[index] = widths[index].max(display_width(cell));
        }
    }

    widths
}

fn display_width(text: &str) -> usize {
    text.chars().count()
}

fn border(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.extend(std::iter::repeat_n(fill, width + 2));
        line.push('+');
    }

    line
}

fn render_cells(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (index, width) in widths.iter().enumerate() {
        let cell = cells.get(index).map_or("", String::as_str);
        line.push(' ');
        line.push_str(cell);
        line.extend(std::iter::repeat_n(
            ' ',
            width.saturating_sub(display_width(cell)) + 1,
        ));
        line.push('|');
    }

    line
}
