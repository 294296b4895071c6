//! Supply dimensioning: circuit counts, demand aggregation, breaker and
//! panel sizing.
//!
//! All load arithmetic is integer watts. Circuit and module counts are
//! always ceiling-rounded: under-provisioning is a safety defect,
//! over-provisioning is a cost line.

use crate::catalog::{DemandBand, DimensioningConfig};
use crate::loads::{self, LoadModelError};
use crate::schema::{DimensioningResult, Room, RoomDimensioning};

/// Resolved electrical load of one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLoadSummary {
    pub room_id: String,
    /// One circuit per unit of dedicated equipment.
    pub dedicated_circuits: u32,
    /// Connected watts of equipment that shares circuits.
    pub shared_watts: u64,
    /// Connected watts of everything in the room.
    pub connected_watts: u64,
}

impl RoomLoadSummary {
    /// Resolve a room through the load model. Fails on the first
    /// unresolvable equipment item.
    pub fn of(room: &Room) -> Result<Self, LoadModelError> {
        let mut dedicated_circuits: u32 = 0;
        let mut shared_watts: u64 = 0;
        let mut connected_watts: u64 = 0;

        for equipment in &room.equipment {
            let load = loads::load_of(equipment)?;
            connected_watts += load.connected_watts;
            if load.requires_dedicated_circuit {
                dedicated_circuits += load.quantity;
            } else {
                shared_watts += load.connected_watts;
            }
        }

        Ok(Self {
            room_id: room.room_id.clone(),
            dedicated_circuits,
            shared_watts,
            connected_watts,
        })
    }

    /// Shared circuits needed for this room's shared load.
    pub fn shared_circuits(&self, config: &DimensioningConfig) -> u32 {
        ceil_div(self.shared_watts, config.shared_circuit_capacity_watts)
    }

    /// Total circuits this room requires.
    pub fn required_circuits(&self, config: &DimensioningConfig) -> u32 {
        self.dedicated_circuits + self.shared_circuits(config)
    }
}

/// Compute the installation dimensioning from per-room summaries.
///
/// Pure over its inputs: identical summaries yield identical results.
pub fn dimension_from_summaries(
    summaries: &[RoomLoadSummary],
    config: &DimensioningConfig,
) -> DimensioningResult {
    let per_room: Vec<RoomDimensioning> = summaries
        .iter()
        .map(|s| RoomDimensioning {
            room_id: s.room_id.clone(),
            dedicated_circuits: s.dedicated_circuits,
            shared_circuits: s.shared_circuits(config),
            required_circuits: s.required_circuits(config),
            connected_watts: s.connected_watts,
        })
        .collect();

    let total_connected_watts: u64 = summaries.iter().map(|s| s.connected_watts).sum();
    let total_circuits: u32 = per_room.iter().map(|r| r.required_circuits).sum();
    let demand_watts = demand_watts(total_connected_watts, &config.demand_bands);

    DimensioningResult {
        per_room,
        total_connected_watts,
        demand_watts,
        main_breaker_amps: main_breaker_amps(demand_watts, config),
        panel_ways: panel_ways(total_circuits, config),
    }
}

/// Dimension a full room list. Any unresolvable equipment aborts the
/// dimensioning pass only; validation results are unaffected (the façade
/// keeps them).
pub fn dimension(rooms: &[Room], config: &DimensioningConfig) -> Result<DimensioningResult, LoadModelError> {
    let summaries = rooms
        .iter()
        .map(RoomLoadSummary::of)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(dimension_from_summaries(&summaries, config))
}

/// Apply demand factors band by band, bracket-style: each band scales only
/// its own span of the connected load. The effective factor is a
/// non-increasing step function of load while demand itself never
/// decreases when load grows.
pub fn demand_watts(connected_watts: u64, bands: &[DemandBand]) -> u64 {
    let mut remaining = connected_watts;
    let mut demand: u64 = 0;
    for band in bands {
        if remaining == 0 {
            break;
        }
        let portion = match band.span_watts {
            Some(span) => remaining.min(span),
            None => remaining,
        };
        // Ceiling per band: a 1 W increment must never vanish.
        demand += (portion * band.factor_percent).div_ceil(100);
        remaining -= portion;
    }
    // Unreachable with a validated catalog (last band is unbounded);
    // treat any remainder as undiversified.
    demand + remaining
}

/// Smallest ladder rating whose capacity at nominal voltage covers the
/// demand. Demand beyond the ladder saturates at the top rating.
fn main_breaker_amps(demand_watts: u64, config: &DimensioningConfig) -> u32 {
    let voltage = u64::from(config.nominal_voltage);
    for &rating in &config.breaker_ladder_amps {
        if u64::from(rating) * voltage >= demand_watts {
            return rating;
        }
    }
    let top = config.breaker_ladder_amps.last().copied().unwrap_or_default();
    tracing::warn!(
        demand_watts,
        top_rating = top,
        "demand exceeds the breaker ladder, saturating at the top rating"
    );
    top
}

/// Smallest standard panel size covering the circuit count. Totals beyond
/// the largest module round up to a multiple of it (multi-row panels).
fn panel_ways(total_circuits: u32, config: &DimensioningConfig) -> u32 {
    for &ways in &config.panel_module_ways {
        if ways >= total_circuits {
            return ways;
        }
    }
    let top = config.panel_module_ways.last().copied().unwrap_or_default();
    if top == 0 {
        return total_circuits;
    }
    total_circuits.div_ceil(top) * top
}

fn ceil_div(value: u64, divisor: u64) -> u32 {
    if value == 0 || divisor == 0 {
        return 0;
    }
    u32::try_from(value.div_ceil(divisor)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin;

    #[test]
    fn shared_load_rounds_up() {
        let config = builtin::dimensioning_config();
        let summary = RoomLoadSummary {
            room_id: "r1".into(),
            dedicated_circuits: 0,
            shared_watts: 3_681,
            connected_watts: 3_681,
        };
        assert_eq!(summary.shared_circuits(&config), 2);
    }

    #[test]
    fn exact_capacity_needs_one_circuit() {
        let config = builtin::dimensioning_config();
        let summary = RoomLoadSummary {
            room_id: "r1".into(),
            dedicated_circuits: 0,
            shared_watts: 3_680,
            connected_watts: 3_680,
        };
        assert_eq!(summary.shared_circuits(&config), 1);
    }

    #[test]
    fn demand_is_full_in_first_band() {
        let config = builtin::dimensioning_config();
        assert_eq!(demand_watts(3_000, &config.demand_bands), 3_000);
        assert_eq!(demand_watts(8_000, &config.demand_bands), 8_000);
    }

    #[test]
    fn demand_diversifies_above_first_band() {
        let config = builtin::dimensioning_config();
        // 8000 @ 100% + 2000 @ 80%
        assert_eq!(demand_watts(10_000, &config.demand_bands), 9_600);
    }

    #[test]
    fn demand_is_monotone_across_band_edges() {
        let config = builtin::dimensioning_config();
        let mut previous = 0;
        for connected in (0..40_000).step_by(97) {
            let demand = demand_watts(connected, &config.demand_bands);
            assert!(demand >= previous, "demand regressed at {connected} W");
            previous = demand;
        }
    }

    #[test]
    fn breaker_picks_next_ladder_step() {
        let config = builtin::dimensioning_config();
        // 3000 W / 230 V = 13.04 A -> 15 A
        assert_eq!(main_breaker_amps(3_000, &config), 15);
        // 15 A covers exactly 3450 W
        assert_eq!(main_breaker_amps(3_450, &config), 15);
        assert_eq!(main_breaker_amps(3_451, &config), 20);
    }

    #[test]
    fn panel_rounds_to_module_size() {
        let config = builtin::dimensioning_config();
        assert_eq!(panel_ways(0, &config), 8);
        assert_eq!(panel_ways(9, &config), 12);
        assert_eq!(panel_ways(36, &config), 36);
        assert_eq!(panel_ways(40, &config), 72);
    }
}
