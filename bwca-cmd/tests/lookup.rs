use bwca_cmd::lookup::{build_lake_report, lookup_lake};
use bwca_cmd::rankings::run_rankings;
use bwca_cmd::report::write_lake_report;
use bwca_db::{ReferenceCsv, ReferenceTables};
use bwca_lake::bfi::PercentileTier;
use bwca_lake::error::BwcaError;
use bwca_lake::species::Species;
use bwca_lake::survey::client::SurveyClient;
use bwca_lake::survey::SurveyDocument;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../fixtures")
}

fn fixture_tables() -> ReferenceTables {
    ReferenceTables::load_dir(&fixtures_dir()).unwrap()
}

/// Nothing listens on the discard port, so every fetch is refused.
fn unreachable_client() -> SurveyClient {
    SurveyClient::new("http://127.0.0.1:9/detail.cgi", Duration::from_secs(2)).unwrap()
}

fn saganaga_document() -> SurveyDocument {
    SurveyDocument::from_value(json!({
        "status": "SUCCESS",
        "result": {
            "lakeName": "Saganaga",
            "DOWNumber": "16063300",
            "areaAcres": "13832.04",
            "maxDepthFeet": "280",
            "surveys": [
                {
                    "surveyDate": "2015-06-01",
                    "lengths": { "WAE": { "fishCount": [[10, 7], [11, 2]] } }
                },
                {
                    "surveyDate": "2019-07-10",
                    "narrative": "<p>Walleye were abundant.</p>",
                    "lengths": {
                        "WAE": { "fishCount": [{ "_0": 12, "_1": 5 }, { "_0": 14, "_1": 3 }] },
                        "NOP": { "fishCount": [[24, 2], [30, null]] }
                    }
                }
            ]
        }
    }))
}

#[tokio::test]
async fn failed_fetch_keeps_waypoints_and_suppresses_fishery() {
    let tables = ReferenceTables::from_csv(&ReferenceCsv {
        lakes: "Name,Nearest Town,County,ID\nPhantom,Ely,Lake,999\n",
        campsites: "X,Y,name,desc\n-91.5,47.9,#1,BWCA Campsite - Phantom Lake - #1\n-91.7,48.1,#2,BWCA Campsite - Phantom Lake - #2\n",
        portages: "X,Y,name,desc\n",
        bfi_aggregates: "LakeID,BFI_WAE,BFI_WAE_Pct\n",
        population: None,
    })
    .unwrap();

    let report = lookup_lake(&tables, &unreachable_client(), "Phantom Lake", None)
        .await
        .unwrap();

    assert_eq!(report.lake.lake_id, "999");
    assert_eq!(report.campsite_count, Some(2));
    let (lat, lon) = report.map_center.unwrap();
    assert!((lat - 48.0).abs() < 1e-9);
    assert!((lon + 91.6).abs() < 1e-9);
    assert!(matches!(report.bfi, Err(BwcaError::BfiUnavailable(_))));
    match &report.fishery {
        Err(e @ BwcaError::SurveyFetchFailed { lake_id, .. }) => {
            assert_eq!(lake_id, "999");
            assert!(e.is_fishery_unavailable());
        }
        other => panic!("expected fetch failure, got {:?}", other),
    }

    let mut out = Vec::new();
    write_lake_report(&mut out, &report).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Campsites: 2"));
    assert!(text.contains("Fishery\n  unavailable: No fishery data for lake 999"));
}

#[tokio::test]
async fn shared_lake_name_requires_town() {
    let tables = fixture_tables();

    let err = lookup_lake(&tables, &unreachable_client(), "Bass Lake", None)
        .await
        .unwrap_err();
    match err.downcast_ref::<BwcaError>() {
        Some(BwcaError::AmbiguousLake { name, towns }) => {
            assert_eq!(name, "Bass");
            assert_eq!(towns, &vec!["Ely".to_string(), "Grand Marais".to_string()]);
        }
        other => panic!("expected ambiguity, got {:?}", other),
    }

    let lake = tables.resolve_lake("Bass Lake", Some("Grand Marais")).unwrap();
    assert_eq!(lake.lake_id, "16004300");
    let report = build_lake_report(&tables, lake, Err(BwcaError::NoSurveysInDocument)).unwrap();
    assert_eq!(report.campsite_count, None);
}

#[tokio::test]
async fn unknown_lake_is_not_found() {
    let tables = fixture_tables();
    let err = lookup_lake(&tables, &unreachable_client(), "Atlantis", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BwcaError>(),
        Some(BwcaError::LakeNotFound(name)) if name == "Atlantis"
    ));
}

#[test]
fn end_to_end_with_in_memory_document() {
    let tables = fixture_tables();
    let lake = tables.resolve_lake("Saganaga", None).unwrap();
    let report = build_lake_report(&tables, lake, Ok(saganaga_document())).unwrap();

    assert_eq!(report.campsite_count, Some(3));

    let bfi = report.bfi.as_ref().unwrap();
    let walleye_bfi = bfi.iter().find(|b| b.species == Species::Walleye).unwrap();
    assert_eq!(walleye_bfi.score_display.as_deref(), Some("1.27"));
    assert_eq!(walleye_bfi.percentile_display.as_deref(), Some("96.10%"));
    assert_eq!(walleye_bfi.tier, Some(PercentileTier::Trophy));

    let fishery = report.fishery.as_ref().unwrap();
    assert_eq!(fishery.survey.date, "2019-07-10");
    let walleye = fishery.species[&Species::Walleye].as_ref().unwrap();
    let pct: Vec<(u8, f64)> = walleye.distribution.iter().collect();
    assert_eq!(pct, vec![(12, 0.625), (14, 0.375)]);
    assert!(walleye.comparison[12].population_pct.is_some());

    let pike = fishery.species[&Species::NorthernPike].as_ref().unwrap();
    assert_eq!(pike.fish_counted, 2);
    let pike_pct: Vec<(u8, f64)> = pike.distribution.iter().collect();
    assert_eq!(pike_pct, vec![(24, 1.0)]);
    assert!(matches!(
        fishery.species[&Species::LakeTrout],
        Err(BwcaError::SpeciesDataAbsent(Species::LakeTrout))
    ));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("distribution.csv");
    fishery
        .table
        .write_csv(std::fs::File::create(&path).unwrap())
        .unwrap();
    let csv = std::fs::read_to_string(&path).unwrap();
    assert_eq!(csv.lines().count(), 48);
    assert_eq!(csv.lines().nth(13), Some("12,,,5,,,,0.625,"));
    // Pike listed 30" with a null count: the bin stays blank.
    assert_eq!(csv.lines().nth(31), Some("30,,,,,,,,"));

    let mut out = Vec::new();
    write_lake_report(&mut out, &report).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Most recent survey: 2019-07-10"));
    assert!(text.contains("Area: 13832.04 acres"));
    assert!(text.contains("Walleye: 8 fish measured, most common 12\" (62.50%)"));
    assert!(text.contains("No data for Lake Trout"));
}

#[test]
fn rankings_export_from_fixtures() {
    let tables = fixture_tables();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("walleye.csv");
    run_rankings(&tables, Species::Walleye, None, 3, Some(&path)).unwrap();

    let csv = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "lake,ID,Nearest Town,County,BFI_WAE,BFI_WAE_Pct");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("Saganaga,16063300,"));
    assert!(lines[2].starts_with("Lac La Croix,69016900,"));
    assert!(lines[3].starts_with("Insula,38063600,"));
}
