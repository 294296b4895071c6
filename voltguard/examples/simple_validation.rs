//! Minimal end-to-end run against the builtin catalog.
//!
//! Run with: cargo run --example simple_validation

use voltguard::prelude::*;
use voltguard::Equipment;

#[tokio::main]
async fn main() {
    let engine = Engine::new();

    let request = ValidationRequest {
        installation_id: "demo-1".into(),
        postal_code: Some("75011".into()),
        number_of_people: Some(3),
        rooms: vec![
            Room::new("kitchen-1", RoomType::Kitchen, 12.0)
                .with_equipment(Equipment::new("lighting_point", 1))
                .with_equipment(Equipment::new("socket_outlet", 6))
                .with_equipment(Equipment::new("dedicated_oven_circuit", 1))
                .with_equipment(Equipment::new("dishwasher", 1)),
            Room::new("living-1", RoomType::Living, 22.0)
                .with_equipment(Equipment::new("lighting_point", 2))
                .with_equipment(Equipment::new("socket_outlet", 5)),
        ],
        include_dimensioning: true,
    };

    match engine.evaluate(&request).await {
        Ok(response) => {
            println!("Verdict: {:?}", response.verdict);
            for finding in &response.findings {
                println!(
                    "  {:?} [{}] {} (room: {:?})",
                    finding.severity, finding.rule_id, finding.message_key, finding.room_id
                );
            }
            if let Some(dim) = response.dimensioning {
                println!(
                    "Dimensioning: {} W connected, {} W demand, {} A main breaker, {} ways",
                    dim.total_connected_watts,
                    dim.demand_watts,
                    dim.main_breaker_amps,
                    dim.panel_ways
                );
            }
        }
        Err(e) => eprintln!("Evaluation failed: {e}"),
    }
}
