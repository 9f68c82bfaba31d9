//! Command implementations. Each loads the data file, runs one operation
//! and returns what the binary prints.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use bullseye_core::ShooterAverages;
use bullseye_model::{Caliber, Match, MatchId, ScoreRecord, Shooter, ShooterId, StageEntry};
use bullseye_report::{
    MatchReport, ReportOptions, ReportTable, build_match_report, build_report_table,
    render_workbook, write_table_csv,
};
use bullseye_store::{InMemoryStore, MatchStore, ScoreDraft, Scorebook, ShooterStore};

pub fn open_scorebook(data: &Path) -> Result<Scorebook<InMemoryStore>> {
    let store = InMemoryStore::load(data)
        .with_context(|| format!("load data file {}", data.display()))?;
    Ok(Scorebook::new(store))
}

#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub match_id: String,
    pub xlsx: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub options: ReportOptions,
}

#[derive(Debug)]
pub struct ReportOutcome {
    pub report: MatchReport,
    pub table: ReportTable,
    /// Files written, in the order they were produced.
    pub written: Vec<PathBuf>,
}

pub fn run_report(data: &Path, request: &ReportRequest) -> Result<ReportOutcome> {
    let span = info_span!("report", match_id = %request.match_id);
    let _guard = span.enter();

    let book = open_scorebook(data)?;
    let match_id = MatchId::new(request.match_id.as_str())?;
    let snapshot = book
        .match_snapshot(&match_id)
        .with_context(|| format!("load match {match_id}"))?;
    let report = build_match_report(&snapshot);
    let table = build_report_table(&snapshot);

    let mut written = Vec::new();
    if let Some(path) = &request.xlsx {
        let bytes = render_workbook(&report, &table, &request.options).context("render workbook")?;
        ensure_parent(path)?;
        fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), "wrote workbook");
        written.push(path.clone());
    }
    if let Some(path) = &request.csv {
        ensure_parent(path)?;
        let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        write_table_csv(&table, BufWriter::new(file))
            .with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), "wrote csv");
        written.push(path.clone());
    }

    Ok(ReportOutcome {
        report,
        table,
        written,
    })
}

#[derive(Debug, Clone)]
pub struct ScoreRequest {
    pub match_id: String,
    pub shooter_id: String,
    pub instance: String,
    pub caliber: String,
    /// `NAME=SCORE[:X]` entries.
    pub stages: Vec<String>,
}

/// Record a score and save the data file.
pub fn run_score(data: &Path, request: &ScoreRequest) -> Result<ScoreRecord> {
    let book = open_scorebook(data)?;
    let stages = request
        .stages
        .iter()
        .map(|entry| parse_stage(entry))
        .collect::<Result<Vec<_>>>()?;
    let draft = ScoreDraft {
        shooter_id: ShooterId::new(request.shooter_id.as_str())?,
        match_id: MatchId::new(request.match_id.as_str())?,
        match_type_instance: request.instance.trim().to_string(),
        caliber: Caliber::new(request.caliber.as_str()),
        stages,
    };
    let record = book.record_score(draft).context("record score")?;
    book.store()
        .save(data)
        .with_context(|| format!("save data file {}", data.display()))?;
    info!(score_id = %record.id, total = ?record.total_score, "score recorded");
    Ok(record)
}

/// Parse `NAME=SCORE` or `NAME=SCORE:X`.
pub fn parse_stage(entry: &str) -> Result<StageEntry> {
    let Some((name, value)) = entry.split_once('=') else {
        bail!("stage must look like NAME=SCORE[:X], got {entry:?}");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("stage name is empty in {entry:?}");
    }
    let (score, x_count) = match value.split_once(':') {
        Some((score, x)) => (score, Some(x)),
        None => (value, None),
    };
    let score: u32 = score
        .trim()
        .parse()
        .with_context(|| format!("invalid score in {entry:?}"))?;
    let x_count = x_count
        .map(|x| x.trim().parse::<u32>())
        .transpose()
        .with_context(|| format!("invalid x-count in {entry:?}"))?;
    Ok(StageEntry::new(name, Some(score), x_count))
}

pub fn run_averages(data: &Path, shooter_id: &str) -> Result<(Shooter, ShooterAverages)> {
    let book = open_scorebook(data)?;
    let shooter_id = ShooterId::new(shooter_id)?;
    let shooter = book
        .store()
        .get_shooter(&shooter_id)
        .with_context(|| format!("load shooter {shooter_id}"))?;
    let averages = book.shooter_averages(&shooter_id)?;
    Ok((shooter, averages))
}

pub fn run_matches(data: &Path) -> Result<Vec<Match>> {
    let book = open_scorebook(data)?;
    let mut matches = book.store().list_matches()?;
    matches.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    Ok(matches)
}

pub fn run_shooters(data: &Path) -> Result<Vec<Shooter>> {
    let book = open_scorebook(data)?;
    let mut shooters = book.store().list_shooters()?;
    shooters.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(shooters)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    Ok(())
}
