//! Evaluate against a custom JSON rule catalog instead of the builtin one.
//!
//! Run with: cargo run --example custom_rules

use voltguard::prelude::*;
use voltguard::Equipment;

const CATALOG: &str = r#"{
  "version": "custom-demo-1",
  "rules": [
    {
      "id": "outdoor.lighting.mandatory",
      "message_key": "finding.outdoor.lighting.missing",
      "severity": "WARNING",
      "room_types": ["outdoor"],
      "check": { "type": "MandatoryPresence", "equipment_type": "lighting_point" }
    },
    {
      "id": "global.panel",
      "message_key": "finding.global.panel.capacity_exceeded",
      "severity": "ERROR",
      "check": { "type": "GlobalPanelLimit", "max_circuits": 12 }
    }
  ]
}"#;

#[tokio::main]
async fn main() {
    let catalog = RuleCatalog::from_json_str(CATALOG).expect("catalog should parse");
    let engine = Engine::with_catalog(catalog);

    let request = ValidationRequest {
        installation_id: "demo-custom".into(),
        postal_code: None,
        number_of_people: None,
        rooms: vec![Room::new("terrace", RoomType::Outdoor, 18.0)
            .with_equipment(Equipment::new("socket_outlet", 2))],
        include_dimensioning: false,
    };

    let response = engine.evaluate(&request).await.expect("evaluation should run");
    println!("Verdict: {:?}", response.verdict);
    for finding in &response.findings {
        println!("  {:?} [{}] {}", finding.severity, finding.rule_id, finding.message_key);
    }
}
