//! Report table: a header/row matrix whose columns follow the match setup.
//!
//! A match that declares an aggregate gets the aggregate layout, with one
//! block of sub-field columns per caliber under a caliber header. Every other
//! match gets the plain layout, one column per (instance, caliber) slot.

use std::collections::BTreeSet;
use std::fmt;

use bullseye_core::{
    AggregateField, AggregateRule, StageSum, aggregate_rule, aggregates, classify_stage,
    qualifying_base_scores, round2,
};
use bullseye_model::{Caliber, Match, MatchSnapshot, ScoreKey, ScoreRecord, ShooterId};
use serde::Serialize;

use crate::display;
use crate::payload::roster;

pub const SHOOTER_HEADER: &str = "Shooter";
pub const AGGREGATE_TOTAL_HEADER: &str = "Aggregate Total";
pub const AVERAGE_HEADER: &str = "Average";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Aggregate,
    Plain,
}

/// A header label covering `span` columns starting at `col`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub label: String,
    pub col: u16,
    pub span: u16,
}

impl HeaderCell {
    fn single(label: impl Into<String>, col: u16) -> Self {
        Self {
            label: label.into(),
            col,
            span: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ReportCell {
    Text(String),
    /// A single match's total.
    MatchTotal(StageSum),
    /// A sum over several entries; present only when something contributed.
    AggregateSum(Option<StageSum>),
    Average(Option<f64>),
    NoData,
}

impl fmt::Display for ReportCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportCell::Text(text) => f.write_str(text),
            ReportCell::MatchTotal(sum) => {
                f.write_str(&display::match_total(sum.score, sum.x_count))
            }
            ReportCell::AggregateSum(sum) => f.write_str(&display::aggregate_sum(*sum)),
            ReportCell::Average(value) => f.write_str(&display::average(*value)),
            ReportCell::NoData => f.write_str(display::NO_DATA),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub shooter_id: ShooterId,
    pub cells: Vec<ReportCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTable {
    pub layout: Layout,
    pub title: String,
    /// Top to bottom; the last row names every column.
    pub header_rows: Vec<Vec<HeaderCell>>,
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn column_count(&self) -> u16 {
        self.header_rows
            .iter()
            .flatten()
            .map(|cell| cell.col + cell.span)
            .max()
            .unwrap_or(0)
    }

    /// Labels of the last header row.
    pub fn column_labels(&self) -> Vec<&str> {
        self.header_rows
            .last()
            .map(|row| row.iter().map(|cell| cell.label.as_str()).collect())
            .unwrap_or_default()
    }

    /// Columns left of the first score column.
    pub fn leading_columns(&self) -> u16 {
        2
    }
}

/// Build the report table for a match snapshot.
pub fn build_report_table(snapshot: &MatchSnapshot) -> ReportTable {
    let match_ = &snapshot.match_;
    match aggregate_rule(&match_.aggregate_type) {
        Some(rule) => aggregate_table(snapshot, rule),
        None => plain_table(snapshot),
    }
}

fn title(match_: &Match) -> String {
    if match_.location.trim().is_empty() {
        format!("{} ({})", match_.name, match_.date)
    } else {
        format!("{}, {} ({})", match_.name, match_.location, match_.date)
    }
}

/// Calibers fired in instances of the aggregate's base course.
fn base_calibers(match_: &Match, rule: &AggregateRule) -> BTreeSet<Caliber> {
    match_
        .match_types
        .iter()
        .filter(|instance| instance.match_type == rule.base)
        .flat_map(|instance| instance.calibers.iter().cloned())
        .collect()
}

fn aggregate_table(snapshot: &MatchSnapshot, rule: &AggregateRule) -> ReportTable {
    let match_ = &snapshot.match_;
    let calibers = base_calibers(match_, rule);
    let width = rule.fields.len() as u16;

    let mut caliber_row = Vec::with_capacity(calibers.len());
    let mut field_row = vec![
        HeaderCell::single(SHOOTER_HEADER, 0),
        HeaderCell::single(AGGREGATE_TOTAL_HEADER, 1),
    ];
    let mut col = 2u16;
    for caliber in &calibers {
        caliber_row.push(HeaderCell {
            label: caliber.to_string(),
            col,
            span: width,
        });
        for field in rule.fields {
            field_row.push(HeaderCell::single(rule.field_label(*field), col));
            col += 1;
        }
    }

    let rows = roster(snapshot)
        .into_iter()
        .map(|entry| {
            let owned: Vec<ScoreRecord> = entry.scores.iter().map(|r| (*r).clone()).collect();
            let qualifying: Vec<&ScoreRecord> =
                qualifying_base_scores(&owned, match_, rule).collect();

            let grand_total = aggregates(&owned, match_).values().fold(
                None,
                |acc: Option<StageSum>, result| {
                    let mut sum = acc.unwrap_or_default();
                    sum += StageSum::new(result.score, result.x_count);
                    Some(sum)
                },
            );
            let mut cells = Vec::with_capacity(field_row.len());
            for caliber in &calibers {
                let records: Vec<&ScoreRecord> = qualifying
                    .iter()
                    .copied()
                    .filter(|r| r.caliber == *caliber)
                    .collect();
                for field in rule.fields {
                    cells.push(ReportCell::AggregateSum(field_sum(&records, *field)));
                }
            }

            let mut row = vec![
                ReportCell::Text(entry.shooter.name.clone()),
                grand_total.map_or(ReportCell::NoData, |sum| ReportCell::AggregateSum(Some(sum))),
            ];
            row.extend(cells);
            ReportRow {
                shooter_id: entry.shooter.id,
                cells: row,
            }
        })
        .collect();

    ReportTable {
        layout: Layout::Aggregate,
        title: title(match_),
        header_rows: vec![caliber_row, field_row],
        rows,
    }
}

/// Sum one sub-field over a caliber's qualifying records.
///
/// Family fields count fired stages of that family; the total field counts
/// whole-entry totals. `None` when nothing contributed.
fn field_sum(records: &[&ScoreRecord], field: AggregateField) -> Option<StageSum> {
    let mut sum: Option<StageSum> = None;
    match field.family() {
        Some(family) => {
            for stage in records.iter().flat_map(|r| r.stages.iter()) {
                if stage.fired() && classify_stage(&stage.name) == Some(family) {
                    *sum.get_or_insert_with(StageSum::default) += StageSum::of_stage(stage);
                }
            }
        }
        None => {
            for record in records {
                if let Some(total) = record.total_score {
                    *sum.get_or_insert_with(StageSum::default) +=
                        StageSum::new(total, record.total_x_count.unwrap_or(0));
                }
            }
        }
    }
    sum
}

/// Slots in column order: instances by name, calibers by precedence.
fn plain_columns(match_: &Match) -> Vec<ScoreKey> {
    let mut instances: Vec<_> = match_.match_types.iter().collect();
    instances.sort_by(|a, b| a.instance_name.cmp(&b.instance_name));
    instances
        .into_iter()
        .flat_map(|instance| instance.keys())
        .collect()
}

fn plain_table(snapshot: &MatchSnapshot) -> ReportTable {
    let match_ = &snapshot.match_;
    let columns = plain_columns(match_);

    let mut header = vec![
        HeaderCell::single(SHOOTER_HEADER, 0),
        HeaderCell::single(AVERAGE_HEADER, 1),
    ];
    for (offset, key) in columns.iter().enumerate() {
        header.push(HeaderCell::single(key.to_string(), 2 + offset as u16));
    }

    let rows = roster(snapshot)
        .into_iter()
        .map(|entry| {
            let totals: Vec<u32> = entry.scores.iter().filter_map(|r| r.total_score).collect();
            let average = if totals.is_empty() {
                ReportCell::NoData
            } else {
                let sum: u64 = totals.iter().map(|t| u64::from(*t)).sum();
                ReportCell::Average(Some(round2(sum as f64 / totals.len() as f64)))
            };

            let mut cells = vec![ReportCell::Text(entry.shooter.name.clone()), average];
            for key in &columns {
                let record = entry.scores.iter().find(|r| r.key() == *key);
                cells.push(match record.and_then(|r| r.total_score.map(|t| (t, r))) {
                    Some((total, r)) => {
                        ReportCell::MatchTotal(StageSum::new(total, r.total_x_count.unwrap_or(0)))
                    }
                    None => ReportCell::NoData,
                });
            }
            ReportRow {
                shooter_id: entry.shooter.id,
                cells,
            }
        })
        .collect();

    ReportTable {
        layout: Layout::Plain,
        title: title(match_),
        header_rows: vec![header],
        rows,
    }
}
