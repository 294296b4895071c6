//! Installation-wide rule evaluation.
//!
//! Runs after the per-room pass has been joined: panel capacity against
//! the summed circuit requirement, plus the advisory occupancy heuristic
//! when the caller supplied an occupant count.

use crate::catalog::{DimensioningConfig, Rule, RuleCatalog, RuleCheck};
use crate::dimensioning::RoomLoadSummary;
use crate::schema::{Finding, Room, Severity};

/// Rule id of the occupancy socket heuristic. Not a catalog rule: the
/// table driving it lives in the dimensioning config.
pub const OCCUPANCY_RULE_ID: &str = "global.occupancy.sockets";
pub const OCCUPANCY_MESSAGE_KEY: &str = "finding.occupancy.sockets_below_recommended";

const SOCKET_OUTLET: &str = "socket_outlet";

/// Evaluate installation-wide rules.
///
/// `summaries` holds the resolved load of each room, `None` where the
/// load model failed; the circuit total is then a lower bound, which only
/// under-reports, never fabricates, a panel violation.
pub fn validate_global(
    rooms: &[Room],
    summaries: &[Option<RoomLoadSummary>],
    rules: &[&Rule],
    catalog: &RuleCatalog,
    number_of_people: Option<u32>,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    let total_circuits: u32 = summaries
        .iter()
        .flatten()
        .map(|s| s.required_circuits(&catalog.dimensioning))
        .sum();

    for rule in rules {
        if let RuleCheck::GlobalPanelLimit { max_circuits } = &rule.check {
            if total_circuits > *max_circuits {
                tracing::debug!(
                    total_circuits,
                    max_circuits,
                    rule_id = %rule.id,
                    "panel capacity exceeded"
                );
                findings.push(Finding::global(&rule.id, rule.severity, &rule.message_key));
            }
        }
    }

    if let Some(people) = number_of_people {
        findings.extend(occupancy_findings(rooms, &catalog.dimensioning, people));
    }

    findings
}

/// Occupancy-driven socket minimums. Advisory by design: code limits are
/// room-type driven, occupancy is a comfort heuristic, so violations are
/// warnings.
fn occupancy_findings(
    rooms: &[Room],
    config: &DimensioningConfig,
    people: u32,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    if people == 0 {
        return findings;
    }

    for room in rooms {
        let Some(entry) = config
            .occupancy_sockets
            .iter()
            .find(|o| o.room_type == room.room_type)
        else {
            continue;
        };
        if entry.occupants_per_socket == 0 {
            continue;
        }
        let min_sockets = people.div_ceil(entry.occupants_per_socket);
        if room.quantity_of(SOCKET_OUTLET) < min_sockets {
            findings.push(Finding::room(
                OCCUPANCY_RULE_ID,
                Severity::Warning,
                OCCUPANCY_MESSAGE_KEY,
                &room.room_id,
            ));
        }
    }
    findings
}
