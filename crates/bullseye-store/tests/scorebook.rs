use std::fs;
use std::path::PathBuf;

use bullseye_model::{
    AggregateType, Caliber, Match, MatchId, MatchType, MatchTypeInstance, Shooter, ShooterId,
    StageEntry,
};
use bullseye_store::{
    InMemoryStore, MatchStore, ScoreDraft, ScoreFilter, ScoreStore, Scorebook, ShooterStore,
    StoreError,
};
use chrono::NaiveDate;

fn temp_snapshot_path() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("bullseye_store_{stamp}"));
    dir.push("scores.json");
    dir
}

fn mid(value: &str) -> MatchId {
    MatchId::new(value).unwrap()
}

fn sid(value: &str) -> ShooterId {
    ShooterId::new(value).unwrap()
}

fn league_match() -> Match {
    Match {
        id: mid("m1"),
        name: "Summer League".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 7, 20).unwrap(),
        location: "Club Range".to_string(),
        match_types: vec![
            MatchTypeInstance::new(MatchType::Nmc, "NMC", [".22".into(), "CF".into()]),
            MatchTypeInstance::new(MatchType::NineHundred, "900 A", [".22".into()]),
        ],
        aggregate_type: AggregateType::None,
    }
}

fn scorebook() -> Scorebook<InMemoryStore> {
    let store = InMemoryStore::new();
    store.put_shooter(Shooter::new(sid("p1"), "Ada Marksman")).unwrap();
    store.put_shooter(Shooter::new(sid("p2"), "Ben Trigger")).unwrap();
    let book = Scorebook::new(store);
    book.create_match(league_match()).unwrap();
    book
}

fn nmc_draft(shooter: &str, caliber: &str, stages: Vec<StageEntry>) -> ScoreDraft {
    ScoreDraft {
        shooter_id: sid(shooter),
        match_id: mid("m1"),
        match_type_instance: "NMC".to_string(),
        caliber: Caliber::from(caliber),
        stages,
    }
}

#[test]
fn record_score_fills_missing_stages_and_derives_totals() {
    let book = scorebook();
    let record = book
        .record_score(nmc_draft(
            "p1",
            ".22",
            vec![
                StageEntry::new("RF", Some(95), Some(2)),
                StageEntry::new("SF", Some(90), Some(1)),
            ],
        ))
        .unwrap();

    let names: Vec<&str> = record.stages.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["SF", "TF", "RF"]);
    assert_eq!(record.stages[1], StageEntry::blank("TF"));
    assert_eq!(record.total_score, Some(185));
    assert_eq!(record.total_x_count, Some(3));
    assert!(!record.not_shot);
}

#[test]
fn record_score_replaces_existing_slot() {
    let book = scorebook();
    let first = book
        .record_score(nmc_draft("p1", ".22", vec![StageEntry::new("SF", Some(80), None)]))
        .unwrap();
    let second = book
        .record_score(nmc_draft("p1", ".22", vec![StageEntry::new("SF", Some(88), None)]))
        .unwrap();

    assert_eq!(first.id, second.id);
    let stored = book
        .store()
        .query_scores(&ScoreFilter::for_match(mid("m1")))
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].total_score, Some(88));
}

#[test]
fn blank_entry_is_stored_as_not_shot() {
    let book = scorebook();
    let record = book.record_score(nmc_draft("p1", "CF", Vec::new())).unwrap();
    assert!(record.not_shot);
    assert_eq!(record.total_score, None);
    assert_eq!(record.total_x_count, None);
}

#[test]
fn record_score_rejects_bad_entries() {
    let book = scorebook();

    let unknown_stage = book.record_score(nmc_draft(
        "p1",
        ".22",
        vec![StageEntry::new("SF1", Some(90), None)],
    ));
    assert!(matches!(unknown_stage, Err(StoreError::InvalidEntry(_))));

    let duplicate = book.record_score(nmc_draft(
        "p1",
        ".22",
        vec![
            StageEntry::new("SF", Some(90), None),
            StageEntry::new("SF", Some(91), None),
        ],
    ));
    assert!(matches!(duplicate, Err(StoreError::InvalidEntry(_))));

    let over_max = book.record_score(nmc_draft(
        "p1",
        ".22",
        vec![
            StageEntry::new("SF", Some(100), None),
            StageEntry::new("TF", Some(100), None),
            StageEntry::new("RF", Some(101), None),
        ],
    ));
    assert!(matches!(over_max, Err(StoreError::InvalidEntry(_))));

    let wrong_caliber = book.record_score(nmc_draft("p1", ".45", Vec::new()));
    assert!(matches!(wrong_caliber, Err(StoreError::InvalidEntry(_))));

    let unknown_shooter = book.record_score(nmc_draft("nobody", ".22", Vec::new()));
    assert!(unknown_shooter.unwrap_err().is_not_found());
}

#[test]
fn update_score_rederives_totals() {
    let book = scorebook();
    let record = book
        .record_score(nmc_draft("p1", ".22", vec![StageEntry::new("SF", Some(90), Some(1))]))
        .unwrap();

    let updated = book
        .update_score(
            &record.id,
            vec![
                StageEntry::new("SF", Some(92), Some(2)),
                StageEntry::new("TF", Some(0), Some(0)),
            ],
        )
        .unwrap();
    assert_eq!(updated.total_score, Some(92));
    assert_eq!(updated.total_x_count, Some(2));
    assert_eq!(book.store().get_score(&record.id).unwrap(), updated);
}

#[test]
fn create_match_rejects_duplicate_id() {
    let book = scorebook();
    let err = book.create_match(league_match()).unwrap_err();
    assert!(matches!(err, StoreError::Conflict { entity: "match", .. }));
}

#[test]
fn removing_a_caliber_deletes_only_its_scores() {
    let book = scorebook();
    for shooter in ["p1", "p2"] {
        for caliber in [".22", "CF"] {
            book.record_score(nmc_draft(
                shooter,
                caliber,
                vec![StageEntry::new("SF", Some(85), None)],
            ))
            .unwrap();
        }
    }

    let mut edited = league_match();
    edited.match_types[0].calibers.remove(&Caliber::from("CF"));
    let update = book.update_match(edited).unwrap();

    assert_eq!(update.removed.len(), 1);
    assert_eq!(update.removed[0].to_string(), "NMC_CF");
    assert_eq!(update.scores_deleted, 2);

    let left = book
        .store()
        .query_scores(&ScoreFilter::for_match(mid("m1")))
        .unwrap();
    assert_eq!(left.len(), 2);
    assert!(left.iter().all(|s| s.caliber == Caliber::from(".22")));
}

#[test]
fn removing_an_instance_deletes_all_its_scores() {
    let book = scorebook();
    let draft = ScoreDraft {
        match_type_instance: "900 A".to_string(),
        stages: vec![StageEntry::new("SF1", Some(95), Some(3))],
        ..nmc_draft("p1", ".22", Vec::new())
    };
    book.record_score(draft).unwrap();
    book.record_score(nmc_draft("p1", ".22", Vec::new())).unwrap();

    let mut edited = league_match();
    edited.match_types.retain(|i| i.instance_name != "900 A");
    let update = book.update_match(edited).unwrap();
    assert_eq!(update.scores_deleted, 1);
    assert_eq!(
        book.store()
            .query_scores(&ScoreFilter::for_match(mid("m1")))
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn update_match_on_missing_match_changes_nothing() {
    let book = scorebook();
    let mut other = league_match();
    other.id = mid("m9");
    assert!(book.update_match(other).unwrap_err().is_not_found());
    assert!(book.store().get_match(&mid("m9")).is_err());
}

#[test]
fn delete_match_cascades_to_scores() {
    let book = scorebook();
    book.record_score(nmc_draft("p1", ".22", Vec::new())).unwrap();
    book.record_score(nmc_draft("p2", ".22", Vec::new())).unwrap();

    assert_eq!(book.delete_match(&mid("m1")).unwrap(), 2);
    assert!(book.store().list_matches().unwrap().is_empty());
    assert!(
        book.store()
            .query_scores(&ScoreFilter::default())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn match_snapshot_collects_referenced_shooters() {
    let book = scorebook();
    book.record_score(nmc_draft("p2", ".22", Vec::new())).unwrap();

    let snapshot = book.match_snapshot(&mid("m1")).unwrap();
    assert_eq!(snapshot.match_.id, mid("m1"));
    assert_eq!(snapshot.scores.len(), 1);
    assert_eq!(snapshot.shooters.len(), 1);
    assert_eq!(snapshot.shooters[0].name, "Ben Trigger");
}

#[test]
fn shooter_averages_skip_not_shot_entries() {
    let book = scorebook();
    book.record_score(nmc_draft(
        "p1",
        ".22",
        vec![
            StageEntry::new("SF", Some(90), Some(1)),
            StageEntry::new("TF", Some(95), Some(2)),
            StageEntry::new("RF", Some(93), Some(0)),
        ],
    ))
    .unwrap();
    book.record_score(nmc_draft("p1", "CF", Vec::new())).unwrap();

    let averages = book.shooter_averages(&sid("p1")).unwrap();
    assert_eq!(averages.by_caliber.len(), 1);
    let bucket = averages.by_caliber[&Caliber::from(".22")];
    assert_eq!(bucket.overall.count, 1);
    assert_eq!(bucket.overall.score_avg(), Some(278.0));
    assert_eq!(bucket.nmc.count, 1);
    assert_eq!(bucket.timed_fire.score_avg(), Some(95.0));
}

#[test]
fn snapshot_file_round_trips() {
    let path = temp_snapshot_path();
    let book = scorebook();
    book.record_score(nmc_draft("p1", ".22", vec![StageEntry::new("SF", Some(90), None)]))
        .unwrap();
    book.store().save(&path).unwrap();

    let reloaded = InMemoryStore::load(&path).unwrap();
    assert_eq!(
        reloaded.to_snapshot().unwrap().scores,
        book.store().to_snapshot().unwrap().scores
    );
    assert_eq!(reloaded.list_shooters().unwrap().len(), 2);

    if let Some(dir) = path.parent() {
        let _ = fs::remove_dir_all(dir);
    }
}

#[test]
fn missing_snapshot_file_loads_empty() {
    let path = temp_snapshot_path();
    let store = InMemoryStore::load(&path).unwrap();
    assert!(store.list_matches().unwrap().is_empty());
}
