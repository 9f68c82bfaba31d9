//! Terminal tables.

use bullseye_core::{AverageBucket, ShooterAverages, StageFamily, Tally, resolve};
use bullseye_model::{Caliber, Match, MatchType, Shooter};
use bullseye_report::{NO_DATA, ReportCell, ReportTable};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

/// The match-type catalog: stages, subtotal groups and maximum score.
pub fn catalog_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Type"),
        header_cell("Stages"),
        header_cell("Subtotals"),
        header_cell("Max"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for match_type in &MatchType::KNOWN {
        let config = resolve(match_type);
        let subtotals: Vec<String> = config
            .subtotal_groups
            .iter()
            .map(|group| format!("{}={}", group.name, group.members.join("+")))
            .collect();
        table.add_row(vec![
            Cell::new(match_type.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(config.entry_stages.join(", ")),
            if subtotals.is_empty() {
                dim_cell(NO_DATA)
            } else {
                Cell::new(subtotals.join(", "))
            },
            Cell::new(config.max_score),
        ]);
    }
    table
}

/// The report table; caliber names head each aggregate sub-field column.
pub fn report_table(report: &ReportTable) -> Table {
    let mut table = Table::new();
    let groups = report
        .header_rows
        .len()
        .checked_sub(2)
        .and_then(|index| report.header_rows.get(index));
    let header: Vec<Cell> = report
        .header_rows
        .last()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    let group = groups.and_then(|cells| {
                        cells
                            .iter()
                            .find(|g| cell.col >= g.col && cell.col < g.col + g.span)
                    });
                    match group {
                        Some(group) => header_cell(&format!("{}\n{}", group.label, cell.label)),
                        None => header_cell(&cell.label),
                    }
                })
                .collect()
        })
        .unwrap_or_default();
    table.set_header(header);
    apply_table_style(&mut table);
    for index in 1..usize::from(report.column_count()) {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for row in &report.rows {
        table.add_row(row.cells.iter().map(report_cell).collect::<Vec<_>>());
    }
    table
}

fn report_cell(cell: &ReportCell) -> Cell {
    match cell {
        ReportCell::Text(text) => Cell::new(text).add_attribute(Attribute::Bold),
        ReportCell::NoData | ReportCell::AggregateSum(None) | ReportCell::Average(None) => {
            dim_cell(cell)
        }
        ReportCell::MatchTotal(sum) if sum.is_zero() => dim_cell(cell),
        other => Cell::new(other),
    }
}

pub fn matches_table(matches: &[Match]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Name"),
        header_cell("Date"),
        header_cell("Location"),
        header_cell("Courses"),
        header_cell("Aggregate"),
    ]);
    apply_table_style(&mut table);
    for value in matches {
        let courses: Vec<String> = value
            .match_types
            .iter()
            .map(|instance| {
                let calibers: Vec<&str> = instance.calibers.iter().map(Caliber::as_str).collect();
                format!("{} [{}]", instance.instance_name, calibers.join(", "))
            })
            .collect();
        table.add_row(vec![
            Cell::new(value.id.as_str()),
            Cell::new(&value.name),
            Cell::new(value.date),
            text_or_dim(&value.location),
            Cell::new(courses.join("\n")),
            if value.aggregate_type.is_declared() {
                Cell::new(value.aggregate_type.as_str())
            } else {
                dim_cell(NO_DATA)
            },
        ]);
    }
    table
}

pub fn shooters_table(shooters: &[Shooter]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Name"),
        header_cell("NRA"),
        header_cell("CMP"),
    ]);
    apply_table_style(&mut table);
    for shooter in shooters {
        table.add_row(vec![
            Cell::new(shooter.id.as_str()),
            Cell::new(&shooter.name),
            text_or_dim(shooter.nra_number.as_deref().unwrap_or_default()),
            text_or_dim(shooter.cmp_number.as_deref().unwrap_or_default()),
        ]);
    }
    table
}

/// Per-caliber averages: overall, each stage family and NMC entries.
pub fn averages_table(averages: &ShooterAverages) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Caliber"),
        header_cell("Matches"),
        header_cell("Average"),
        header_cell("X Avg"),
        header_cell("SF"),
        header_cell("TF"),
        header_cell("RF"),
        header_cell("NMC"),
    ]);
    apply_table_style(&mut table);
    for index in 1..8 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (caliber, bucket) in &averages.by_caliber {
        table.add_row(bucket_row(caliber.as_str(), bucket));
    }
    table
}

fn bucket_row(caliber: &str, bucket: &AverageBucket) -> Vec<Cell> {
    vec![
        Cell::new(caliber)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(bucket.overall.count),
        average_cell(bucket.overall.score_avg()),
        average_cell(bucket.overall.x_count_avg()),
        average_cell(bucket.family(StageFamily::SlowFire).score_avg()),
        average_cell(bucket.family(StageFamily::TimedFire).score_avg()),
        average_cell(bucket.family(StageFamily::RapidFire).score_avg()),
        average_cell(bucket.family(StageFamily::Nmc).score_avg()),
    ]
}

/// Averages split by match type, one row per (type, caliber).
pub fn match_type_averages_table(averages: &ShooterAverages) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Type"),
        header_cell("Caliber"),
        header_cell("Matches"),
        header_cell("Average"),
        header_cell("X Avg"),
    ]);
    apply_table_style(&mut table);
    for index in 2..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (match_type, calibers) in &averages.by_match_type {
        for (caliber, tally) in calibers {
            table.add_row(tally_row(match_type, caliber.as_str(), tally));
        }
    }
    table
}

fn tally_row(match_type: &MatchType, caliber: &str, tally: &Tally) -> Vec<Cell> {
    vec![
        Cell::new(match_type.as_str()).fg(Color::Blue),
        Cell::new(caliber),
        Cell::new(tally.count),
        average_cell(tally.score_avg()),
        average_cell(tally.x_count_avg()),
    ]
}

fn average_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(format!("{value:.2}")),
        None => dim_cell(NO_DATA),
    }
}

fn text_or_dim(value: &str) -> Cell {
    if value.trim().is_empty() {
        dim_cell(NO_DATA)
    } else {
        Cell::new(value)
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
