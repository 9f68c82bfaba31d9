//! Tests for bullseye-model types.

use bullseye_model::{
    AggregateType, Caliber, Match, MatchType, ScoreRecord, Shooter, ShooterId, StageEntry,
};

#[test]
fn score_record_round_trips_through_json() {
    let json = r#"{
        "id": "s1",
        "shooter_id": "p1",
        "match_id": "m1",
        "caliber": ".22",
        "match_type_instance": "NMC",
        "stages": [
            {"name": "SF", "score": 95, "x_count": 3},
            {"name": "TF", "score": null, "x_count": 0},
            {"name": "RF", "score": 90, "x_count": 2}
        ],
        "total_score": 185,
        "total_x_count": 5,
        "not_shot": false
    }"#;
    let record: ScoreRecord = serde_json::from_str(json).expect("deserialize score");
    assert_eq!(record.caliber, Caliber::from(".22"));
    assert_eq!(record.stage("TF"), Some(&StageEntry::new("TF", None, Some(0))));
    assert_eq!(record.key().to_string(), "NMC_.22");

    let again = serde_json::to_string(&record).expect("serialize score");
    let round: ScoreRecord = serde_json::from_str(&again).expect("deserialize again");
    assert_eq!(round, record);
}

#[test]
fn match_with_unknown_tags_still_loads() {
    let json = r#"{
        "id": "m9",
        "name": "Legacy",
        "date": "2019-07-04",
        "location": "Camp Perry",
        "match_types": [{"type": "Gallery", "instance_name": "G1", "calibers": ["CF"]}],
        "aggregate_type": "3600"
    }"#;
    let m: Match = serde_json::from_str(json).expect("deserialize match");
    assert_eq!(m.match_types[0].match_type, MatchType::Other("Gallery".into()));
    assert_eq!(m.aggregate_type, AggregateType::Other("3600".into()));
    assert!(!m.aggregate_type.is_declared());
}

#[test]
fn calibers_in_instance_are_kept_in_precedence_order() {
    let json = r#"{
        "id": "m3",
        "name": "Three gun",
        "date": "2024-06-01",
        "match_types": [{"type": "900", "instance_name": "900", "calibers": [".45", "CF", ".22"]}]
    }"#;
    let m: Match = serde_json::from_str(json).expect("deserialize match");
    let calibers: Vec<&str> = m.match_types[0]
        .calibers
        .iter()
        .map(Caliber::as_str)
        .collect();
    assert_eq!(calibers, vec![".22", "CF", ".45"]);
}

#[test]
fn shooter_external_ids_are_optional() {
    let shooter = Shooter::new(ShooterId::new("p1").unwrap(), "Ada Marksman");
    let json = serde_json::to_string(&shooter).expect("serialize shooter");
    assert_eq!(json, r#"{"id":"p1","name":"Ada Marksman"}"#);
}
