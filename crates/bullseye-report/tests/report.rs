use bullseye_core::renormalize;
use bullseye_model::{
    AggregateType, Caliber, Match, MatchId, MatchSnapshot, MatchType, MatchTypeInstance, ScoreId,
    ScoreRecord, Shooter, ShooterId, StageEntry,
};
use bullseye_report::{
    Layout, ReportOptions, build_match_report, build_report_table, render_workbook,
    write_report_json, write_table_csv,
};
use chrono::NaiveDate;

fn nine_hundred_stages(base: u32, x: u32) -> Vec<StageEntry> {
    [
        ("SF1", base),
        ("SF2", base),
        ("TF1", base),
        ("TF2", base),
        ("RF1", base),
        ("RF2", base),
        ("SFNMC", base),
        ("TFNMC", base),
        ("RFNMC", base),
    ]
    .into_iter()
    .map(|(name, score)| StageEntry::new(name, Some(score), Some(x)))
    .collect()
}

fn score(id: &str, shooter: &str, instance: &str, stages: Vec<StageEntry>) -> ScoreRecord {
    let mut record = ScoreRecord {
        id: ScoreId::new(id).unwrap(),
        shooter_id: ShooterId::new(shooter).unwrap(),
        match_id: MatchId::new("m2700").unwrap(),
        caliber: Caliber::from(".22"),
        match_type_instance: instance.to_string(),
        stages,
        total_score: None,
        total_x_count: None,
        not_shot: true,
    };
    renormalize(&mut record);
    record
}

fn regional_snapshot() -> MatchSnapshot {
    MatchSnapshot {
        match_: Match {
            id: MatchId::new("m2700").unwrap(),
            name: "Regional 2700".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            location: "Camp Perry".to_string(),
            match_types: vec![
                MatchTypeInstance::new(MatchType::NineHundred, "900 A", [".22".into()]),
                MatchTypeInstance::new(MatchType::NineHundred, "900 B", [".22".into()]),
                MatchTypeInstance::new(MatchType::NineHundred, "900 C", [".22".into()]),
            ],
            aggregate_type: AggregateType::TwentySevenHundred,
        },
        shooters: vec![
            Shooter::new(ShooterId::new("p1").unwrap(), "Ada Marksman"),
            Shooter::new(ShooterId::new("p2").unwrap(), "Ben Trigger"),
        ],
        scores: vec![
            score("a1", "p1", "900 A", nine_hundred_stages(96, 1)),
            score("a2", "p1", "900 B", nine_hundred_stages(98, 2)),
            score("a3", "p1", "900 C", nine_hundred_stages(97, 0)),
            score("b1", "p2", "900 A", nine_hundred_stages(90, 0)),
            score("b2", "p2", "900 B", Vec::new()),
        ],
    }
}

#[test]
fn aggregates_follow_best_n() {
    let report = build_match_report(&regional_snapshot());
    let ada = &report.shooters[0];
    let result = &ada.aggregates["2700_.22"];
    assert_eq!(result.score, 9 * (96 + 98 + 97));
    assert_eq!(result.x_count, 9 * 3);
    assert_eq!(result.components, ["900 B", "900 C", "900 A"]);

    let ben = &report.shooters[1];
    assert!(ben.aggregates.is_empty());
    assert!(ben.scores["900 B_.22"].score.not_shot);
}

#[test]
fn aggregate_layout_rows() {
    let table = build_report_table(&regional_snapshot());
    assert_eq!(table.layout, Layout::Aggregate);
    assert_eq!(table.title, "Regional 2700, Camp Perry (2024-06-01)");

    let ada: Vec<String> = table.rows[0].cells.iter().map(ToString::to_string).collect();
    insta::assert_snapshot!(ada.join(" | "), @"Ada Marksman | 2619 (27X) | 582 (6X) | 873 (9X) | 582 (6X) | 582 (6X) | 2619 (27X)");

    let ben: Vec<String> = table.rows[1].cells.iter().map(ToString::to_string).collect();
    insta::assert_snapshot!(ben.join(" | "), @"Ben Trigger | - | 180 (0X) | 270 (0X) | 180 (0X) | 180 (0X) | 810 (0X)");
}

fn six_hundred(id: &str, instance: &str, base: Option<u32>) -> ScoreRecord {
    let stages = ["SF1", "SF2", "TF1", "TF2", "RF1", "RF2"]
        .into_iter()
        .map(|name| StageEntry::new(name, base, base.map(|_| 1)))
        .collect();
    let mut record = score(id, "p1", instance, stages);
    record.match_id = MatchId::new("m1800").unwrap();
    record
}

fn league_1800_snapshot() -> MatchSnapshot {
    MatchSnapshot {
        match_: Match {
            id: MatchId::new("m1800").unwrap(),
            name: "League 1800".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 7, 13).unwrap(),
            location: String::new(),
            match_types: ["600 A", "600 B", "600 C", "600 D"]
                .into_iter()
                .map(|name| MatchTypeInstance::new(MatchType::SixHundred, name, [".22".into()]))
                .collect(),
            aggregate_type: AggregateType::Eighteen3x600,
        },
        shooters: vec![Shooter::new(ShooterId::new("p1").unwrap(), "Ada Marksman")],
        scores: vec![
            six_hundred("c1", "600 A", Some(95)),
            six_hundred("c2", "600 B", Some(93)),
            six_hundred("c3", "600 C", Some(97)),
            six_hundred("c4", "600 D", None),
        ],
    }
}

#[test]
fn eighteen_hundred_from_six_hundreds() {
    let snapshot = league_1800_snapshot();
    let report = build_match_report(&snapshot);
    let result = &report.shooters[0].aggregates["1800_.22"];
    assert_eq!(result.score, 6 * (95 + 93 + 97));
    assert_eq!(result.x_count, 18);
    assert_eq!(result.components, ["600 C", "600 A", "600 B"]);

    let table = build_report_table(&snapshot);
    assert_eq!(
        table.column_labels(),
        ["Shooter", "Aggregate Total", "SF", "TF", "RF", "600"]
    );
    let row: Vec<String> = table.rows[0].cells.iter().map(ToString::to_string).collect();
    insta::assert_snapshot!(row.join(" | "), @"Ada Marksman | 1710 (18X) | 570 (6X) | 570 (6X) | 570 (6X) | 1710 (18X)");
}

#[test]
fn stored_totals_are_reported_as_recorded() {
    let mut snapshot = regional_snapshot();
    let stale = &mut snapshot.scores[0];
    stale.stages = nine_hundred_stages(0, 0);

    let report = build_match_report(&snapshot);
    let ada = &report.shooters[0];
    assert_eq!(ada.scores["900 A_.22"].score.total_score, Some(9 * 96));
    assert_eq!(ada.scores["900 A_.22"].score.total_x_count, Some(9));
    assert_eq!(ada.aggregates["2700_.22"].score, 9 * (96 + 98 + 97));

    let table = build_report_table(&snapshot);
    assert_eq!(table.rows[0].cells[1].to_string(), "2619 (27X)");
}

#[test]
fn csv_export_has_header_rows_and_data() {
    let table = build_report_table(&regional_snapshot());
    let mut buffer = Vec::new();
    write_table_csv(&table, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], ",,.22,,,,");
    assert_eq!(lines[1], "Shooter,Aggregate Total,SF,NMC,TF,RF,900");
    assert!(lines[2].starts_with("Ada Marksman,2619 (27X),"));
}

#[test]
fn json_payload_uses_string_keys() {
    let report = build_match_report(&regional_snapshot());
    let mut buffer = Vec::new();
    write_report_json(&report, &mut buffer).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

    assert_eq!(value["match"]["id"], "m2700");
    assert_eq!(value["shooters"][0]["shooter"]["name"], "Ada Marksman");
    assert_eq!(
        value["shooters"][0]["scores"]["900 A_.22"]["subtotals"]["SFNMC"]["score"],
        192
    );
    assert_eq!(
        value["shooters"][0]["aggregates"]["2700_.22"]["score"],
        2619
    );
}

#[test]
fn workbook_renders_to_xlsx_bytes() {
    let snapshot = regional_snapshot();
    let report = build_match_report(&snapshot);
    let table = build_report_table(&snapshot);

    let full = render_workbook(&report, &table, &ReportOptions::default()).unwrap();
    assert!(full.starts_with(b"PK"));

    let summary_only = render_workbook(
        &report,
        &table,
        &ReportOptions {
            detail_sheets: false,
            ..ReportOptions::default()
        },
    )
    .unwrap();
    assert!(summary_only.starts_with(b"PK"));
    assert!(summary_only.len() < full.len());
}

#[test]
fn workbook_renders_names_cut_at_an_apostrophe() {
    let mut snapshot = regional_snapshot();
    snapshot.shooters[0].name = "Christopher Montgomery-Ra O'Neil".to_string();
    let report = build_match_report(&snapshot);
    let table = build_report_table(&snapshot);

    let bytes = render_workbook(&report, &table, &ReportOptions::default()).unwrap();
    assert!(bytes.starts_with(b"PK"));
}
