//! Equipment load model.
//!
//! Converts an equipment assignment into electrical load primitives:
//! connected wattage, protective circuit class, and whether the item must
//! sit on its own dedicated circuit. Backed by the builtin reference table
//! in [`builtin`], with per-item overrides from the equipment
//! specification map.

pub mod builtin;

use serde::{Deserialize, Serialize};

use crate::schema::Equipment;

/// Per-unit wattage override bound. Anything outside (0, MAX] is a data
/// error, not a big appliance.
pub const MAX_OVERRIDE_WATTS: u64 = 30_000;

/// Specification key recognized as a wattage override.
pub const SPEC_POWER_WATTS: &str = "power_watts";

/// Protective device class a circuit must carry for an equipment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitClass {
    Lighting,
    Socket,
    Dedicated16,
    Dedicated20,
    Dedicated32,
}

impl CircuitClass {
    /// Breaker rating in amperes for this class.
    pub fn amps(&self) -> u32 {
        match self {
            CircuitClass::Lighting => 10,
            CircuitClass::Socket | CircuitClass::Dedicated16 => 16,
            CircuitClass::Dedicated20 => 20,
            CircuitClass::Dedicated32 => 32,
        }
    }
}

/// Load primitives for one equipment assignment (quantity included).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipmentLoad {
    /// Watts for a single unit, after any override.
    pub unit_watts: u64,
    /// Watts for the whole assignment (`unit_watts * quantity`).
    pub connected_watts: u64,
    pub circuit_class: CircuitClass,
    /// Each unit of a dedicated item needs its own circuit.
    pub requires_dedicated_circuit: bool,
    pub quantity: u32,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadModelError {
    #[error("unknown equipment type: {0}")]
    UnknownEquipmentType(String),
    #[error("invalid specification for {equipment_type}: {reason}")]
    InvalidSpecification {
        equipment_type: String,
        reason: String,
    },
}

/// Resolve the load primitives of one equipment assignment.
///
/// A `power_watts` entry in the specification map overrides the reference
/// default; the override must be a positive integer number of watts within
/// [`MAX_OVERRIDE_WATTS`].
pub fn load_of(equipment: &Equipment) -> Result<EquipmentLoad, LoadModelError> {
    let reference = builtin::reference(&equipment.equipment_type)
        .ok_or_else(|| LoadModelError::UnknownEquipmentType(equipment.equipment_type.clone()))?;

    let unit_watts = match equipment.specifications.get(SPEC_POWER_WATTS) {
        Some(value) => parse_override(&equipment.equipment_type, value)?,
        None => reference.default_watts,
    };

    Ok(EquipmentLoad {
        unit_watts,
        connected_watts: unit_watts * u64::from(equipment.quantity),
        circuit_class: reference.circuit_class,
        requires_dedicated_circuit: reference.dedicated,
        quantity: equipment.quantity,
    })
}

/// Resolve every assignment in a slice, failing on the first unresolvable
/// item. Callers that need partial results catch the error per room.
pub fn load_of_all(equipment: &[Equipment]) -> Result<Vec<EquipmentLoad>, LoadModelError> {
    equipment.iter().map(load_of).collect()
}

fn parse_override(equipment_type: &str, value: &serde_json::Value) -> Result<u64, LoadModelError> {
    let invalid = |reason: &str| LoadModelError::InvalidSpecification {
        equipment_type: equipment_type.to_string(),
        reason: reason.to_string(),
    };

    let watts = match value {
        serde_json::Value::Number(n) => {
            if let Some(w) = n.as_u64() {
                w
            } else if let Some(f) = n.as_f64() {
                // Fractional watts are tolerated from upstream forms; the
                // engine works in integer watts.
                if f.fract() != 0.0 || f < 0.0 {
                    return Err(invalid("power_watts must be a non-negative integer"));
                }
                f as u64
            } else {
                return Err(invalid("power_watts must be a non-negative integer"));
            }
        }
        serde_json::Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| invalid("power_watts must be a non-negative integer"))?,
        _ => return Err(invalid("power_watts must be a number")),
    };

    if watts == 0 {
        return Err(invalid("power_watts must be greater than zero"));
    }
    if watts > MAX_OVERRIDE_WATTS {
        return Err(invalid("power_watts exceeds the 30000 W bound"));
    }
    Ok(watts)
}
