//! Builtin equipment reference table.
//!
//! Default wattages and circuit requirements per equipment type, matching
//! the equipment picker shipped with the product. Values follow NF C
//! 15-100 sizing practice: high-draw appliances get a dedicated circuit
//! with a 20 A or 32 A protective device, everything else shares lighting
//! or socket circuits.

use super::CircuitClass;

/// Reference entry for one equipment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipmentRef {
    pub default_watts: u64,
    pub circuit_class: CircuitClass,
    pub dedicated: bool,
}

const fn shared(default_watts: u64, circuit_class: CircuitClass) -> EquipmentRef {
    EquipmentRef {
        default_watts,
        circuit_class,
        dedicated: false,
    }
}

const fn dedicated(default_watts: u64, circuit_class: CircuitClass) -> EquipmentRef {
    EquipmentRef {
        default_watts,
        circuit_class,
        dedicated: true,
    }
}

/// Look up the reference entry for an equipment type key.
pub fn reference(equipment_type: &str) -> Option<EquipmentRef> {
    let entry = match equipment_type {
        // Shared circuits
        "socket_outlet" => shared(200, CircuitClass::Socket),
        "socket_outlet_reinforced" => shared(500, CircuitClass::Socket),
        "lighting_point" => shared(100, CircuitClass::Lighting),
        "wall_light" => shared(75, CircuitClass::Lighting),
        "ceiling_fan" => shared(80, CircuitClass::Lighting),
        "refrigerator" => shared(300, CircuitClass::Socket),
        "freezer" => shared(350, CircuitClass::Socket),
        "microwave" => shared(1_000, CircuitClass::Socket),
        "extractor_hood" => shared(250, CircuitClass::Socket),
        "vmc" => shared(150, CircuitClass::Lighting),
        "towel_rail" => shared(750, CircuitClass::Socket),
        "convector_heater" => shared(1_500, CircuitClass::Socket),

        // Dedicated circuits
        "oven" => dedicated(3_000, CircuitClass::Dedicated20),
        "dedicated_oven_circuit" => dedicated(3_000, CircuitClass::Dedicated20),
        "electric_hob" => dedicated(7_200, CircuitClass::Dedicated32),
        "dishwasher" => dedicated(2_200, CircuitClass::Dedicated16),
        "washing_machine" => dedicated(2_200, CircuitClass::Dedicated16),
        "tumble_dryer" => dedicated(2_500, CircuitClass::Dedicated16),
        "water_heater" => dedicated(2_400, CircuitClass::Dedicated20),
        "electric_boiler" => dedicated(6_000, CircuitClass::Dedicated32),
        "air_conditioner" => dedicated(2_500, CircuitClass::Dedicated20),
        "ev_charger" => dedicated(7_400, CircuitClass::Dedicated32),

        _ => return None,
    };
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_draw_appliances_are_dedicated() {
        for ty in ["oven", "electric_hob", "water_heater", "ev_charger"] {
            let entry = reference(ty).unwrap();
            assert!(entry.dedicated, "{ty} should require a dedicated circuit");
        }
    }

    #[test]
    fn sockets_and_lighting_are_shared() {
        assert!(!reference("socket_outlet").unwrap().dedicated);
        assert!(!reference("lighting_point").unwrap().dedicated);
    }

    #[test]
    fn unknown_type_yields_none() {
        assert!(reference("tokamak").is_none());
    }
}
