//! End-to-end engine tests over JSON request fixtures.

use std::path::PathBuf;
use std::time::Instant;

use voltguard::catalog::builtin;
use voltguard::prelude::*;
use voltguard::{parse_request, CatalogError, DataIssueKind, Equipment};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_fixture(name: &str) -> ValidationRequest {
    let json = std::fs::read_to_string(fixture_path(name)).expect("fixture should exist");
    parse_request(&json).expect("fixture should parse")
}

#[tokio::test]
async fn valid_installation_passes_with_dimensioning() {
    let engine = Engine::new();
    let request = load_fixture("valid_installation.json");

    let response = engine.evaluate(&request).await.expect("evaluation should run");

    assert_eq!(response.verdict, Verdict::Pass);
    assert!(
        response.findings.is_empty(),
        "unexpected findings: {:?}",
        response.findings
    );
    assert!(response.data_issues.is_empty());
    assert_eq!(response.catalog_version, builtin::BUILTIN_VERSION);

    let dim = response.dimensioning.expect("dimensioning was requested");
    assert_eq!(dim.total_connected_watts, 10_500);
    // 8000 @ 100% + 2500 @ 80%
    assert_eq!(dim.demand_watts, 10_000);
    assert_eq!(dim.main_breaker_amps, 63);
    assert_eq!(dim.panel_ways, 8);
    assert_eq!(dim.per_room.len(), 3);
    assert_eq!(dim.per_room[0].room_id, "kitchen-1");
    assert_eq!(dim.per_room[0].dedicated_circuits, 3);
    assert_eq!(dim.per_room[0].required_circuits, 4);
}

#[tokio::test]
async fn kitchen_without_oven_circuit_fails() {
    let engine = Engine::new();
    let request = load_fixture("kitchen_missing_oven.json");

    let response = engine.evaluate(&request).await.expect("evaluation should run");

    assert_eq!(response.verdict, Verdict::Fail);
    let oven_finding = response
        .findings
        .iter()
        .find(|f| f.rule_id == "kitchen.oven_circuit.mandatory")
        .expect("missing oven circuit must be flagged");
    assert_eq!(oven_finding.severity, Severity::Error);
    assert_eq!(oven_finding.room_id.as_deref(), Some("kitchen-1"));
    // No dimensioning requested.
    assert!(response.dimensioning.is_none());
    // All findings here are room-scoped.
    assert!(response.findings.iter().all(|f| f.room_id.is_some()));
}

#[tokio::test]
async fn unknown_equipment_degrades_gracefully() {
    let engine = Engine::new();
    let request = load_fixture("unknown_equipment.json");

    let response = engine.evaluate(&request).await.expect("evaluation should run");

    // Findings from the healthy room are still present.
    assert!(
        response
            .findings
            .iter()
            .any(|f| f.room_id.as_deref() == Some("bedroom-1")),
        "bedroom findings must survive the broken room"
    );
    // Dimensioning was requested but is withheld.
    assert!(response.dimensioning.is_none());
    assert_eq!(response.data_issues.len(), 1);
    let issue = &response.data_issues[0];
    assert_eq!(issue.kind, DataIssueKind::UnknownEquipmentType);
    assert_eq!(issue.room_id.as_deref(), Some("technical-1"));
    assert!(issue.detail.contains("plasma_forge"));
}

#[tokio::test]
async fn oversized_installation_gets_one_global_finding() {
    let engine = Engine::new();
    let request = load_fixture("oversized_panel.json");

    let response = engine.evaluate(&request).await.expect("evaluation should run");

    assert_eq!(response.verdict, Verdict::Fail);
    let global: Vec<_> = response
        .findings
        .iter()
        .filter(|f| f.rule_id == "global.panel.capacity")
        .collect();
    assert_eq!(global.len(), 1);
    assert!(global[0].room_id.is_none());
    assert_eq!(global[0].severity, Severity::Error);

    // 21 circuits per room, rounded up to a multi-row panel.
    let dim = response.dimensioning.expect("dimensioning was requested");
    assert_eq!(dim.panel_ways, 72);
    assert_eq!(dim.main_breaker_amps, 63);
}

#[tokio::test]
async fn warnings_alone_do_not_fail_the_verdict() {
    let engine = Engine::new();
    let request = ValidationRequest {
        installation_id: "inst-warn".into(),
        postal_code: None,
        number_of_people: None,
        rooms: vec![Room::new("b1", RoomType::Bathroom, 6.0)
            .with_equipment(Equipment::new("lighting_point", 1))
            .with_equipment(Equipment::new("socket_outlet", 4))],
        include_dimensioning: false,
    };

    let response = engine.evaluate(&request).await.expect("evaluation should run");
    assert_eq!(response.verdict, Verdict::Pass);
    assert_eq!(response.warning_count(), 1);
    assert_eq!(response.error_count(), 0);
}

#[tokio::test]
async fn jurisdiction_rules_apply_by_postal_code() {
    let engine = Engine::new();
    let bathroom = Room::new("b1", RoomType::Bathroom, 6.0)
        .with_equipment(Equipment::new("lighting_point", 1))
        .with_equipment(Equipment::new("socket_outlet", 3));

    let mut request = ValidationRequest {
        installation_id: "inst-paris".into(),
        postal_code: Some("75001".into()),
        number_of_people: None,
        rooms: vec![bathroom],
        include_dimensioning: false,
    };

    // Paris overlay caps bathroom sockets at 2.
    let response = engine.evaluate(&request).await.expect("evaluation should run");
    assert!(response
        .findings
        .iter()
        .any(|f| f.rule_id == "fr75.bathroom.sockets.max"));

    // Elsewhere (and for unknown postal codes) the default set applies.
    request.postal_code = Some("69001".into());
    let response = engine.evaluate(&request).await.expect("evaluation should run");
    assert!(response.findings.is_empty());

    request.postal_code = Some("not-a-code".into());
    let response = engine.evaluate(&request).await.expect("evaluation should run");
    assert!(response.findings.is_empty());
}

#[tokio::test]
async fn cold_engine_reports_catalog_unavailable() {
    let engine = Engine::cold();
    assert!(!engine.is_ready());

    let request = load_fixture("valid_installation.json");
    let err = engine.evaluate(&request).await.expect_err("no catalog loaded");
    assert!(matches!(
        err,
        EngineError::Catalog(CatalogError::Unavailable)
    ));

    // After a reload the same engine serves requests.
    engine
        .reload(builtin::catalog())
        .expect("builtin catalog is valid");
    assert!(engine.is_ready());
    let response = engine.evaluate(&request).await.expect("evaluation should run");
    assert_eq!(response.verdict, Verdict::Pass);
}

#[tokio::test]
async fn duplicate_room_ids_are_an_integrity_error() {
    let engine = Engine::new();
    let request = ValidationRequest {
        installation_id: "inst-dup".into(),
        postal_code: None,
        number_of_people: None,
        rooms: vec![
            Room::new("r1", RoomType::Living, 20.0),
            Room::new("r1", RoomType::Bedroom, 10.0),
        ],
        include_dimensioning: false,
    };

    let err = engine.evaluate(&request).await.expect_err("duplicate ids");
    assert!(matches!(err, EngineError::InputIntegrity(_)));
}

#[tokio::test]
async fn non_positive_room_area_is_an_integrity_error() {
    let engine = Engine::new();
    let request = ValidationRequest {
        installation_id: "inst-area".into(),
        postal_code: None,
        number_of_people: None,
        rooms: vec![Room::new("r1", RoomType::Living, 0.0)],
        include_dimensioning: false,
    };

    let err = engine.evaluate(&request).await.expect_err("zero area");
    assert!(matches!(err, EngineError::InputIntegrity(_)));
}

#[tokio::test]
async fn expired_deadline_cancels_between_phases() {
    let engine = Engine::new();
    let request = load_fixture("valid_installation.json");
    let options = EvaluationOptions {
        deadline: Some(Instant::now()),
    };

    let err = engine
        .evaluate_with(&request, options)
        .await
        .expect_err("deadline already elapsed");
    assert!(matches!(err, EngineError::DeadlineExceeded { .. }));
}

#[tokio::test]
async fn evaluation_is_deterministic_per_snapshot() {
    let engine = Engine::new();
    let request = load_fixture("oversized_panel.json");

    let first = engine.evaluate(&request).await.expect("run one");
    let second = engine.evaluate(&request).await.expect("run two");

    let ids = |r: &ValidationResponse| {
        r.findings
            .iter()
            .map(|f| (f.rule_id.clone(), f.room_id.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.dimensioning, second.dimensioning);
}
