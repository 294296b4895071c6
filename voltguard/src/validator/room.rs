//! Per-room rule evaluation.
//!
//! Every applicable rule is evaluated in catalog order; the pass never
//! short-circuits on the first error, so the caller gets the complete
//! finding list in one run. Finding order for a room follows catalog
//! order and is part of the output contract.

use crate::catalog::{Rule, RuleCheck};
use crate::dimensioning::RoomLoadSummary;
use crate::loads::LoadModelError;
use crate::schema::{DataIssue, DataIssueKind, Finding, Room, Severity};

/// Result of validating one room.
#[derive(Debug, Clone)]
pub struct RoomOutcome {
    pub findings: Vec<Finding>,
    pub data_issues: Vec<DataIssue>,
    /// Load summary, present only when every equipment item resolved.
    pub summary: Option<RoomLoadSummary>,
}

/// Evaluate one room against its catalog rules.
///
/// Presence and quantity checks need only declared quantities and always
/// run. Load-dependent checks (`MinCircuits`, `LoadLimit`) need the load
/// model; when an equipment item cannot be resolved they are skipped for
/// this room and a [`DataIssue`] records why. Other rooms are unaffected.
pub fn validate_room(room: &Room, rules: &[&Rule]) -> RoomOutcome {
    let mut findings = Vec::new();
    let mut data_issues = Vec::new();

    let summary = match RoomLoadSummary::of(room) {
        Ok(summary) => Some(summary),
        Err(err) => {
            tracing::debug!(room_id = %room.room_id, %err, "room load resolution failed");
            data_issues.push(data_issue(room, &err));
            None
        }
    };

    for rule in rules {
        match &rule.check {
            RuleCheck::MandatoryPresence {
                equipment_type,
                min_quantity,
            } => {
                if room.quantity_of(equipment_type) < *min_quantity {
                    findings.push(Finding::room(
                        &rule.id,
                        rule.severity,
                        &rule.message_key,
                        &room.room_id,
                    ));
                }
            }
            RuleCheck::MaxQuantity {
                equipment_type,
                limit,
            } => {
                if room.quantity_of(equipment_type) > *limit {
                    findings.push(Finding::room(
                        &rule.id,
                        rule.severity,
                        &rule.message_key,
                        &room.room_id,
                    ));
                }
            }
            RuleCheck::MinCircuits { min_dedicated } => {
                if let Some(summary) = &summary {
                    if summary.dedicated_circuits < *min_dedicated {
                        findings.push(Finding::room(
                            &rule.id,
                            Severity::Error,
                            &rule.message_key,
                            &room.room_id,
                        ));
                    }
                }
            }
            RuleCheck::LoadLimit {
                soft_watts,
                hard_watts,
            } => {
                if let Some(summary) = &summary {
                    if summary.connected_watts > *hard_watts {
                        findings.push(Finding::room(
                            &rule.id,
                            Severity::Error,
                            &rule.message_key,
                            &room.room_id,
                        ));
                    } else if summary.connected_watts > *soft_watts {
                        findings.push(Finding::room(
                            &rule.id,
                            Severity::Warning,
                            &rule.message_key,
                            &room.room_id,
                        ));
                    }
                }
            }
            // Global rules are dispatched by the global pass.
            RuleCheck::GlobalPanelLimit { .. } => {}
        }
    }

    RoomOutcome {
        findings,
        data_issues,
        summary,
    }
}

fn data_issue(room: &Room, err: &LoadModelError) -> DataIssue {
    let kind = match err {
        LoadModelError::UnknownEquipmentType(_) => DataIssueKind::UnknownEquipmentType,
        LoadModelError::InvalidSpecification { .. } => DataIssueKind::InvalidSpecification,
    };
    DataIssue {
        room_id: Some(room.room_id.clone()),
        kind,
        detail: err.to_string(),
    }
}
