//! VoltGuard - electrical-installation compliance and dimensioning engine
//!
//! Given a project's rooms and their assigned equipment, VoltGuard checks
//! the installation against a versioned electrical-code rule catalog and
//! computes the minimum safe supply dimensioning (circuit counts, main
//! breaker rating, panel size, demand-reduced load).
//!
//! # Quick Start
//!
//! ```no_run
//! use voltguard::{Engine, Equipment, Room, RoomType, ValidationRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = Engine::new();
//!     let request = ValidationRequest {
//!         installation_id: "inst-1".into(),
//!         postal_code: Some("69001".into()),
//!         number_of_people: Some(3),
//!         rooms: vec![Room::new("kitchen-1", RoomType::Kitchen, 12.5)
//!             .with_equipment(Equipment::new("socket_outlet", 6))
//!             .with_equipment(Equipment::new("lighting_point", 1))],
//!         include_dimensioning: true,
//!     };
//!
//!     let response = engine.evaluate(&request).await.unwrap();
//!     for finding in &response.findings {
//!         println!("{:?}: {}", finding.severity, finding.message_key);
//!     }
//! }
//! ```
//!
//! # Features
//!
//! - **Room validation**: mandatory equipment, quantity caps, dedicated
//!   circuits, per-room load limits
//! - **Global validation**: panel capacity, occupancy socket heuristics
//! - **Dimensioning**: circuit counts, demand-factor aggregation, breaker
//!   and panel sizing
//! - **Hot-reloadable catalog**: declarative JSON rules, atomic snapshot
//!   swap, jurisdiction overlays

pub mod catalog;
pub mod core;
pub mod dimensioning;
pub mod loads;
pub mod schema;
pub mod validator;

// Re-export main types
pub use crate::core::{parse_request, Engine, EngineError, EvaluationOptions};
pub use catalog::{CatalogError, CatalogStore, DimensioningConfig, Rule, RuleCatalog, RuleCheck};
pub use loads::{load_of, CircuitClass, EquipmentLoad, LoadModelError};
pub use schema::{
    DataIssue, DataIssueKind, DimensioningResult, Equipment, Finding, Room, RoomDimensioning,
    RoomType, Severity, ValidationRequest, ValidationResponse, Verdict,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Engine, EngineError, Equipment, EvaluationOptions, Finding, Room, RoomType, RuleCatalog,
        Severity, ValidationRequest, ValidationResponse, Verdict,
    };
}
