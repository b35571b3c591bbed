//! End-to-end pipeline tests
//!
//! Drive a full run against a stubbed provider and scratch data files:
//! reference tables, filters, id assignment, merge and persistence all
//! exercised together.

use std::fs;
use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;

use tatl_common::config::{Config, DataConfig, FilterConfig, LoggingConfig};
use tatl_ingest::pipeline::{IngestPipeline, RunOutcome};

fn write_reference_tables(dir: &TempDir) {
    fs::write(
        dir.path().join("airlines.csv"),
        "BAW,British Airways\nEIN,Aer Lingus\nDAL,Delta Air Lines\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("aircraft.csv"),
        "B744,Boeing 747-400\nA333,Airbus A330-300\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("airports.csv"),
        "KBGR,BGR,US\nEGLL,LHR,GB\nEINN,SNN,IE\nKJFK,JFK,US\nCYYZ,YYZ,CA\n",
    )
    .unwrap();
}

fn test_config(dir: &TempDir, base_url: &str) -> Config {
    Config {
        airport: "KBGR".to_string(),
        how_many: 15,
        base_url: base_url.to_string(),
        api_user: Some("user".to_string()),
        api_key: Some("key".to_string()),
        timezone: "US/Eastern".to_string(),
        home_country: "US".to_string(),
        data: DataConfig {
            airlines: dir.path().join("airlines.csv"),
            aircraft: dir.path().join("aircraft.csv"),
            airports: dir.path().join("airports.csv"),
            ledger: dir.path().join("ledger.csv"),
        },
        filters: FilterConfig::default(),
        aircraft_overrides: Vec::new(),
        logging: LoggingConfig::default(),
    }
}

/// A fetch window holding one keeper and one reject per category:
/// arrivals carry a transatlantic 747, a medical N901 and an unmapped
/// aircraft; departures carry a transatlantic A330 and a domestic hop.
async fn mock_provider(server: &mut mockito::Server) {
    // 1_654_088_400 = 2022-06-01 13:00 UTC = 09:00 US/Eastern
    let arrivals = json!({
        "ArrivedResult": {
            "arrivals": [
                { "ident": "BAW123", "aircrafttype": "B744",
                  "origin": "EGLL", "destination": "KBGR",
                  "actualarrivaltime": 1_654_088_400i64 },
                { "ident": "N901", "aircrafttype": "B744",
                  "origin": "EGLL", "destination": "KBGR",
                  "actualarrivaltime": 1_654_088_460i64 },
                { "ident": "UNKN99", "aircrafttype": "ZZZZ",
                  "origin": "EGLL", "destination": "KBGR",
                  "actualarrivaltime": 1_654_088_520i64 }
            ]
        }
    });
    let departures = json!({
        "DepartedResult": {
            "departures": [
                { "ident": "EIN104", "aircrafttype": "A333",
                  "origin": "KBGR", "destination": "EINN",
                  "actualdeparturetime": 1_654_092_000i64 },
                { "ident": "DAL401", "aircrafttype": "B744",
                  "origin": "KBGR", "destination": "KJFK",
                  "actualdeparturetime": 1_654_092_060i64 }
            ]
        }
    });

    server
        .mock("GET", "/Arrived")
        .match_query(mockito::Matcher::UrlEncoded("airport".into(), "KBGR".into()))
        .with_status(200)
        .with_body(arrivals.to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/Departed")
        .match_query(mockito::Matcher::UrlEncoded("airport".into(), "KBGR".into()))
        .with_status(200)
        .with_body(departures.to_string())
        .create_async()
        .await;
}

#[tokio::test]
async fn first_run_persists_only_transatlantic_flights() {
    let dir = TempDir::new().unwrap();
    write_reference_tables(&dir);
    let mut server = mockito::Server::new_async().await;
    mock_provider(&mut server).await;

    let config = test_config(&dir, &server.url());
    let ledger_path = config.data.ledger.clone();
    let pipeline = IngestPipeline::from_config(config).unwrap();

    let outcome = pipeline.run().await.unwrap();
    let added = match outcome {
        RunOutcome::Added { added, total } => {
            assert_eq!(total, 2);
            added
        }
        other => panic!("Expected Added, got {:?}", other),
    };

    assert_eq!(added.len(), 2);
    assert_eq!(added[0].id, "220601BAW123");
    assert_eq!(added[0].airline.as_deref(), Some("British Airways"));
    assert_eq!(added[0].origin_iata, "LHR");
    assert_eq!(added[0].direction.as_str(), "W");
    assert_eq!(added[1].id, "220601EIN104");
    assert_eq!(added[1].destination_iata, "SNN");
    assert_eq!(added[1].direction.as_str(), "E");

    let content = fs::read_to_string(&ledger_path).unwrap();
    assert!(content.starts_with("ID,Date,"));
    assert_eq!(content.lines().count(), 3);
    assert!(content.contains("220601BAW123"));
    assert!(content.contains("220601EIN104"));
    // The rejects never reach the ledger
    assert!(!content.contains("N901"));
    assert!(!content.contains("DAL401"));
    assert!(!content.contains("UNKN99"));
}

#[tokio::test]
async fn second_run_with_the_same_window_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    write_reference_tables(&dir);
    let mut server = mockito::Server::new_async().await;
    mock_provider(&mut server).await;

    let config = test_config(&dir, &server.url());
    let ledger_path = config.data.ledger.clone();
    let pipeline = IngestPipeline::from_config(config).unwrap();

    match pipeline.run().await.unwrap() {
        RunOutcome::Added { .. } => {}
        other => panic!("Expected Added, got {:?}", other),
    }
    let content_after_first = fs::read_to_string(&ledger_path).unwrap();
    let modified_after_first = fs::metadata(&ledger_path).unwrap().modified().unwrap();

    match pipeline.run().await.unwrap() {
        RunOutcome::NothingToDo { total } => assert_eq!(total, 2),
        other => panic!("Expected NothingToDo, got {:?}", other),
    }

    // Not rewritten, not even as a no-op
    let content_after_second = fs::read_to_string(&ledger_path).unwrap();
    assert_eq!(content_after_second, content_after_first);
    let modified_after_second = fs::metadata(&ledger_path).unwrap().modified().unwrap();
    assert_eq!(modified_after_second, modified_after_first);
}

#[tokio::test]
async fn preseeded_ledger_reports_zero_new() {
    let dir = TempDir::new().unwrap();
    write_reference_tables(&dir);
    let mut server = mockito::Server::new_async().await;
    mock_provider(&mut server).await;

    let config = test_config(&dir, &server.url());
    let ledger_path = config.data.ledger.clone();
    fs::write(
        &ledger_path,
        "ID,Date,Airline,Flight,Type,Origin,Origin Country,\
         Destination,Destination Country,Direction\n\
         220601BAW123,2022-06-01,British Airways,123,Boeing 747-400,LHR,GB,BGR,US,W\n\
         220601EIN104,2022-06-01,Aer Lingus,104,Airbus A330-300,BGR,US,SNN,IE,E\n",
    )
    .unwrap();

    let pipeline = IngestPipeline::from_config(config).unwrap();
    match pipeline.run().await.unwrap() {
        RunOutcome::NothingToDo { total } => assert_eq!(total, 2),
        other => panic!("Expected NothingToDo, got {:?}", other),
    }
}

#[tokio::test]
async fn provider_failure_aborts_without_touching_the_ledger() {
    let dir = TempDir::new().unwrap();
    write_reference_tables(&dir);
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/Arrived")
        .match_query(mockito::Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let config = test_config(&dir, &server.url());
    let ledger_path = config.data.ledger.clone();
    let pipeline = IngestPipeline::from_config(config).unwrap();

    assert!(pipeline.run().await.is_err());
    assert!(!ledger_path.exists());
}

#[tokio::test]
async fn new_flights_accumulate_onto_an_existing_ledger() {
    let dir = TempDir::new().unwrap();
    write_reference_tables(&dir);
    let mut server = mockito::Server::new_async().await;
    mock_provider(&mut server).await;

    let config = test_config(&dir, &server.url());
    let ledger_path = config.data.ledger.clone();
    // An older flight already on file; the fetch window adds two more
    fs::write(
        &ledger_path,
        "ID,Date,Airline,Flight,Type,Origin,Origin Country,\
         Destination,Destination Country,Direction\n\
         220530DAL14,2022-05-30,Delta Air Lines,14,Boeing 747-400,JFK,US,LHR,GB,E\n",
    )
    .unwrap();

    let pipeline = IngestPipeline::from_config(config).unwrap();
    match pipeline.run().await.unwrap() {
        RunOutcome::Added { added, total } => {
            assert_eq!(added.len(), 2);
            assert_eq!(total, 3);
        }
        other => panic!("Expected Added, got {:?}", other),
    }

    // Sorted by date: the old May flight stays first
    let content = fs::read_to_string(&ledger_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("220530DAL14"));
}

#[test]
fn ledger_path_can_be_relative() {
    // Config construction is pure; only run() touches the filesystem
    let dir = TempDir::new().unwrap();
    write_reference_tables(&dir);
    let mut config = test_config(&dir, "http://localhost:1");
    config.data.ledger = PathBuf::from("ledger.csv");
    assert!(IngestPipeline::from_config(config).is_ok());
}
