//! Workbook rendering: a "Match Report" summary sheet plus one detail sheet
//! per shooter.
//!
//! Cells are written as text so the no-data marker and zero stay distinct;
//! only the average column is numeric.

use std::collections::HashSet;

use bullseye_model::{Match, ScoreKey};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::debug;

use crate::display;
use crate::error::Result;
use crate::payload::{MatchReport, ScoreEntry, ShooterReport};
use crate::table::{ReportCell, ReportTable};

pub const SUMMARY_SHEET: &str = "Match Report";

/// Hard limit on worksheet names.
const MAX_SHEET_NAME: usize = 31;

const NOT_SHOT: &str = "Not Shot";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Detail sheet names are cut to this many characters before any
    /// disambiguating suffix.
    pub sheet_name_limit: usize,
    pub detail_sheets: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            sheet_name_limit: 28,
            detail_sheets: true,
        }
    }
}

struct Formats {
    title: Format,
    header: Format,
    bold: Format,
    average: Format,
    not_shot: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            title: Format::new().set_bold().set_font_size(14),
            header: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_border_bottom(FormatBorder::Thin)
                .set_background_color("#D9E1F2"),
            bold: Format::new().set_bold(),
            average: Format::new().set_num_format("0.00"),
            not_shot: Format::new()
                .set_italic()
                .set_font_color("#9C0006")
                .set_background_color("#FFC7CE"),
        }
    }
}

/// Render the report into an in-memory `.xlsx` file.
pub fn render_workbook(
    report: &MatchReport,
    table: &ReportTable,
    options: &ReportOptions,
) -> Result<Vec<u8>> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SUMMARY_SHEET)?;
        write_summary(sheet, table, &formats)?;
    }

    if options.detail_sheets {
        let shooter_names: Vec<&str> = report
            .shooters
            .iter()
            .map(|s| s.shooter.name.as_str())
            .collect();
        let names = sheet_names(&shooter_names, options.sheet_name_limit);
        for (shooter, name) in report.shooters.iter().zip(names) {
            let sheet = workbook.add_worksheet();
            sheet.set_name(&name)?;
            write_detail(sheet, &report.match_, shooter, &formats)?;
        }
    }

    let bytes = workbook.save_to_buffer()?;
    debug!(
        sheets = 1 + if options.detail_sheets { report.shooters.len() } else { 0 },
        bytes = bytes.len(),
        "rendered workbook"
    );
    Ok(bytes)
}

fn write_summary(sheet: &mut Worksheet, table: &ReportTable, formats: &Formats) -> Result<()> {
    sheet.write_string_with_format(0, 0, &table.title, &formats.title)?;

    let mut row: u32 = 1;
    for header in &table.header_rows {
        for cell in header {
            if cell.span > 1 {
                sheet.merge_range(
                    row,
                    cell.col,
                    row,
                    cell.col + cell.span - 1,
                    &cell.label,
                    &formats.header,
                )?;
            } else {
                sheet.write_string_with_format(row, cell.col, &cell.label, &formats.header)?;
            }
        }
        row += 1;
    }
    sheet.set_freeze_panes(row, table.leading_columns())?;

    for data in &table.rows {
        for (col, cell) in (0u16..).zip(&data.cells) {
            match cell {
                ReportCell::Average(Some(value)) => {
                    sheet.write_number_with_format(row, col, *value, &formats.average)?;
                }
                ReportCell::Text(text) => {
                    sheet.write_string_with_format(row, col, text, &formats.bold)?;
                }
                other => {
                    sheet.write_string(row, col, other.to_string())?;
                }
            }
        }
        row += 1;
    }

    sheet.set_column_width(0, 24)?;
    for col in 1..table.column_count() {
        sheet.set_column_width(col, 14)?;
    }
    Ok(())
}

/// Slots of the match in summary column order, whether or not they were shot.
fn match_slots(match_: &Match) -> Vec<ScoreKey> {
    let mut instances: Vec<_> = match_.match_types.iter().collect();
    instances.sort_by(|a, b| a.instance_name.cmp(&b.instance_name));
    instances
        .into_iter()
        .flat_map(|instance| instance.keys())
        .collect()
}

fn write_detail(
    sheet: &mut Worksheet,
    match_: &Match,
    shooter: &ShooterReport,
    formats: &Formats,
) -> Result<()> {
    sheet.write_string_with_format(0, 0, &shooter.shooter.name, &formats.title)?;
    sheet.write_string(1, 0, format!("{} ({})", match_.name, match_.date))?;

    let mut row: u32 = 3;
    for key in match_slots(match_) {
        let Some(entry) = shooter.scores.get(&key.to_string()) else {
            continue;
        };
        row = write_section(sheet, row, &key, entry, formats)?;
    }

    if !shooter.aggregates.is_empty() {
        sheet.write_string_with_format(row, 0, "Aggregates", &formats.title)?;
        row += 1;
        for (col, label) in (0u16..).zip(["Aggregate", "Score", "X", "Matches"]) {
            sheet.write_string_with_format(row, col, label, &formats.header)?;
        }
        row += 1;
        for result in shooter.aggregates.values() {
            sheet.write_string_with_format(row, 0, &result.label, &formats.bold)?;
            sheet.write_string(row, 1, result.score.to_string())?;
            sheet.write_string(row, 2, result.x_count.to_string())?;
            sheet.write_string(row, 3, result.components.join(", "))?;
            row += 1;
        }
    }

    sheet.set_column_width(0, 18)?;
    sheet.set_column_width(3, 30)?;
    Ok(())
}

/// One instance/caliber block; returns the next free row.
fn write_section(
    sheet: &mut Worksheet,
    mut row: u32,
    key: &ScoreKey,
    entry: &ScoreEntry,
    formats: &Formats,
) -> Result<u32> {
    let record = &entry.score;
    sheet.write_string_with_format(
        row,
        0,
        format!("{} - {}", key.instance, key.caliber),
        &formats.bold,
    )?;
    row += 1;

    if record.not_shot {
        sheet.write_string_with_format(row, 0, NOT_SHOT, &formats.not_shot)?;
        return Ok(row + 2);
    }

    for (col, label) in (0u16..).zip(["Stage", "Score", "X"]) {
        sheet.write_string_with_format(row, col, label, &formats.header)?;
    }
    row += 1;
    for stage in &record.stages {
        sheet.write_string(row, 0, &stage.name)?;
        sheet.write_string(row, 1, display::scalar(stage.score))?;
        sheet.write_string(row, 2, display::scalar(stage.x_count))?;
        row += 1;
    }
    sheet.write_string_with_format(row, 0, "Total", &formats.bold)?;
    sheet.write_string_with_format(row, 1, display::scalar(record.total_score), &formats.bold)?;
    sheet.write_string_with_format(row, 2, display::scalar(record.total_x_count), &formats.bold)?;
    row += 1;

    for (name, sum) in &entry.subtotals {
        sheet.write_string(row, 0, format!("{name} subtotal"))?;
        sheet.write_string(row, 1, sum.score.to_string())?;
        sheet.write_string(row, 2, sum.x_count.to_string())?;
        row += 1;
    }
    Ok(row + 1)
}

/// Worksheet names for shooters, in order.
///
/// Characters Excel forbids become `_`, names are cut to `limit`
/// characters, and repeats (compared case-insensitively, including the
/// summary sheet) get a ` (n)` suffix.
pub fn sheet_names(names: &[&str], limit: usize) -> Vec<String> {
    let limit = limit.clamp(1, MAX_SHEET_NAME);
    let mut taken: HashSet<String> = HashSet::from([SUMMARY_SHEET.to_lowercase()]);
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        let mut base = sanitize_sheet_name(name);
        if base.is_empty() {
            base = "Shooter".to_string();
        }
        let mut candidate = truncate_sheet_name(&base, limit);
        let mut n = 2;
        while taken.contains(&candidate.to_lowercase()) {
            let suffix = format!(" ({n})");
            let room = MAX_SHEET_NAME.saturating_sub(suffix.len()).min(limit);
            candidate = truncate_sheet_name(&base, room) + &suffix;
            n += 1;
        }
        taken.insert(candidate.to_lowercase());
        out.push(candidate);
    }
    out
}

/// First `limit` characters, without a trailing apostrophe or space.
fn truncate_sheet_name(base: &str, limit: usize) -> String {
    let cut: String = base.chars().take(limit).collect();
    let cut = cut.trim_end_matches(|c: char| c == '\'' || c.is_whitespace());
    if cut.is_empty() {
        "Shooter".to_string()
    } else {
        cut.to_string()
    }
}

fn sanitize_sheet_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    replaced.trim().trim_matches('\'').trim().to_string()
}
