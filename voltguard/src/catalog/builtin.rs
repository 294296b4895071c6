//! Builtin default catalog.
//!
//! The rule set shipped with the engine, derived from NF C 15-100
//! provisioning practice. Deployments replace it with a reviewed JSON
//! catalog; the builtin keeps the engine usable out of the box and anchors
//! the test suite.

use chrono::Utc;

use crate::schema::{RoomType, Severity};

use super::{DemandBand, DimensioningConfig, OccupancySockets, Rule, RuleCatalog, RuleCheck};

pub const BUILTIN_VERSION: &str = "2026.1-nfc15100";

fn rule(
    id: &str,
    message_key: &str,
    severity: Severity,
    room_types: &[RoomType],
    check: RuleCheck,
) -> Rule {
    Rule {
        id: id.to_string(),
        message_key: message_key.to_string(),
        severity,
        room_types: room_types.to_vec(),
        jurisdiction: None,
        enabled: true,
        check,
    }
}

/// Dimensioning tables of the builtin catalog.
pub fn dimensioning_config() -> DimensioningConfig {
    DimensioningConfig {
        nominal_voltage: 230,
        // 16 A shared circuit at 230 V.
        shared_circuit_capacity_watts: 3_680,
        demand_bands: vec![
            DemandBand {
                span_watts: Some(8_000),
                factor_percent: 100,
            },
            DemandBand {
                span_watts: Some(12_000),
                factor_percent: 80,
            },
            DemandBand {
                span_watts: None,
                factor_percent: 60,
            },
        ],
        breaker_ladder_amps: vec![15, 20, 32, 40, 63],
        panel_module_ways: vec![8, 12, 18, 24, 36],
        occupancy_sockets: vec![
            OccupancySockets {
                room_type: RoomType::Living,
                occupants_per_socket: 1,
            },
            OccupancySockets {
                room_type: RoomType::Kitchen,
                occupants_per_socket: 2,
            },
            OccupancySockets {
                room_type: RoomType::Bedroom,
                occupants_per_socket: 2,
            },
        ],
    }
}

/// Build the builtin catalog.
pub fn catalog() -> RuleCatalog {
    let indoor = &[
        RoomType::Living,
        RoomType::Bedroom,
        RoomType::Kitchen,
        RoomType::Bathroom,
        RoomType::Technical,
    ];

    let rules = vec![
        rule(
            "room.lighting.mandatory",
            "finding.room.lighting.missing",
            Severity::Error,
            indoor,
            RuleCheck::MandatoryPresence {
                equipment_type: "lighting_point".to_string(),
                min_quantity: 1,
            },
        ),
        rule(
            "kitchen.oven_circuit.mandatory",
            "finding.kitchen.oven_circuit.missing",
            Severity::Error,
            &[RoomType::Kitchen],
            RuleCheck::MandatoryPresence {
                equipment_type: "dedicated_oven_circuit".to_string(),
                min_quantity: 1,
            },
        ),
        rule(
            "kitchen.sockets.mandatory",
            "finding.kitchen.sockets.insufficient",
            Severity::Error,
            &[RoomType::Kitchen],
            RuleCheck::MandatoryPresence {
                equipment_type: "socket_outlet".to_string(),
                min_quantity: 4,
            },
        ),
        rule(
            "living.sockets.mandatory",
            "finding.living.sockets.insufficient",
            Severity::Error,
            &[RoomType::Living],
            RuleCheck::MandatoryPresence {
                equipment_type: "socket_outlet".to_string(),
                min_quantity: 5,
            },
        ),
        rule(
            "bedroom.sockets.mandatory",
            "finding.bedroom.sockets.insufficient",
            Severity::Error,
            &[RoomType::Bedroom],
            RuleCheck::MandatoryPresence {
                equipment_type: "socket_outlet".to_string(),
                min_quantity: 3,
            },
        ),
        rule(
            "kitchen.dedicated_circuits.min",
            "finding.kitchen.dedicated_circuits.insufficient",
            Severity::Error,
            &[RoomType::Kitchen],
            RuleCheck::MinCircuits { min_dedicated: 3 },
        ),
        rule(
            "bathroom.sockets.max",
            "finding.bathroom.sockets.excessive",
            Severity::Warning,
            &[RoomType::Bathroom],
            RuleCheck::MaxQuantity {
                equipment_type: "socket_outlet".to_string(),
                limit: 3,
            },
        ),
        rule(
            "bathroom.heaters.max",
            "finding.bathroom.heaters.excessive",
            Severity::Warning,
            &[RoomType::Bathroom],
            RuleCheck::MaxQuantity {
                equipment_type: "convector_heater".to_string(),
                limit: 1,
            },
        ),
        rule(
            "room.load.limit",
            "finding.room.load.exceeded",
            Severity::Warning,
            &[],
            RuleCheck::LoadLimit {
                soft_watts: 9_200,
                hard_watts: 13_800,
            },
        ),
        // Paris stock predates reinforced bathroom feeds; stricter cap.
        Rule {
            id: "fr75.bathroom.sockets.max".to_string(),
            message_key: "finding.bathroom.sockets.excessive".to_string(),
            severity: Severity::Warning,
            room_types: vec![RoomType::Bathroom],
            jurisdiction: Some("FR-75".to_string()),
            enabled: true,
            check: RuleCheck::MaxQuantity {
                equipment_type: "socket_outlet".to_string(),
                limit: 2,
            },
        },
        rule(
            "global.panel.capacity",
            "finding.global.panel.capacity_exceeded",
            Severity::Error,
            &[],
            RuleCheck::GlobalPanelLimit { max_circuits: 36 },
        ),
    ];

    RuleCatalog {
        version: BUILTIN_VERSION.to_string(),
        description: Some("Builtin NF C 15-100 rule set".to_string()),
        loaded_at: Utc::now(),
        rules,
        dimensioning: dimensioning_config(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        catalog().validate().expect("builtin catalog must validate");
    }

    #[test]
    fn builtin_has_a_global_panel_rule() {
        let catalog = catalog();
        assert_eq!(
            catalog.global_rules(crate::catalog::DEFAULT_JURISDICTION).len(),
            1
        );
    }
}
