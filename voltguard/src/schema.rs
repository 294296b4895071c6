//! Request/response data model for the validation engine.
//!
//! These types are the wire contract: their serde representation is exactly
//! the JSON exchanged with callers (UI feedback, quote generation, audit
//! snapshots).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Room categories recognized by the rule catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Living,
    Bedroom,
    Kitchen,
    Bathroom,
    Outdoor,
    Technical,
    Other,
}

impl RoomType {
    pub fn name(&self) -> &'static str {
        match self {
            RoomType::Living => "living",
            RoomType::Bedroom => "bedroom",
            RoomType::Kitchen => "kitchen",
            RoomType::Bathroom => "bathroom",
            RoomType::Outdoor => "outdoor",
            RoomType::Technical => "technical",
            RoomType::Other => "other",
        }
    }

    pub fn all() -> &'static [RoomType] {
        &[
            RoomType::Living,
            RoomType::Bedroom,
            RoomType::Kitchen,
            RoomType::Bathroom,
            RoomType::Outdoor,
            RoomType::Technical,
            RoomType::Other,
        ]
    }
}

/// One equipment assignment inside a room.
///
/// `specifications` is a free-form map; the load model recognizes
/// `power_watts` as an override of the reference wattage. A quantity of
/// zero is accepted and means "declared but absent" (plan templates emit
/// these for required-but-unassigned slots).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub equipment_type: String,
    pub quantity: u32,
    #[serde(default)]
    pub specifications: BTreeMap<String, serde_json::Value>,
}

impl Equipment {
    pub fn new(equipment_type: impl Into<String>, quantity: u32) -> Self {
        Self {
            equipment_type: equipment_type.into(),
            quantity,
            specifications: BTreeMap::new(),
        }
    }

    pub fn with_spec(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.specifications.insert(key.into(), value);
        self
    }
}

/// A room with its assigned equipment. Area is in square meters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub room_id: String,
    pub room_type: RoomType,
    pub room_area: f64,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
}

impl Room {
    pub fn new(room_id: impl Into<String>, room_type: RoomType, room_area: f64) -> Self {
        Self {
            room_id: room_id.into(),
            room_type,
            room_area,
            equipment: Vec::new(),
        }
    }

    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equipment.push(equipment);
        self
    }

    /// Total declared quantity of one equipment type in this room.
    pub fn quantity_of(&self, equipment_type: &str) -> u32 {
        self.equipment
            .iter()
            .filter(|e| e.equipment_type == equipment_type)
            .map(|e| e.quantity)
            .sum()
    }
}

/// One full evaluation request: an installation snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub installation_id: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub number_of_people: Option<u32>,
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub include_dimensioning: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

/// One code-compliance finding. Findings are data, never errors: a FAIL
/// verdict is a normal evaluation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Unique id of this finding instance (not the rule).
    pub id: String,
    pub rule_id: String,
    pub severity: Severity,
    /// i18n key resolved by the UI; never display text.
    pub message_key: String,
    /// None for installation-wide (global) findings.
    pub room_id: Option<String>,
}

impl Finding {
    pub fn room(rule_id: &str, severity: Severity, message_key: &str, room_id: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            rule_id: rule_id.to_string(),
            severity,
            message_key: message_key.to_string(),
            room_id: Some(room_id.to_string()),
        }
    }

    pub fn global(rule_id: &str, severity: Severity, message_key: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            rule_id: rule_id.to_string(),
            severity,
            message_key: message_key.to_string(),
            room_id: None,
        }
    }
}

/// Data-integrity problem surfaced alongside a response (not a finding:
/// these mean the input could not be fully interpreted, not that the
/// installation violates code).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataIssue {
    pub room_id: Option<String>,
    pub kind: DataIssueKind,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataIssueKind {
    UnknownEquipmentType,
    InvalidSpecification,
}

/// Dimensioning outcome for one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDimensioning {
    pub room_id: String,
    pub dedicated_circuits: u32,
    pub shared_circuits: u32,
    pub required_circuits: u32,
    pub connected_watts: u64,
}

/// Minimum safe supply dimensioning for the whole installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensioningResult {
    pub per_room: Vec<RoomDimensioning>,
    pub total_connected_watts: u64,
    pub demand_watts: u64,
    pub main_breaker_amps: u32,
    pub panel_ways: u32,
}

/// Full engine response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub verdict: Verdict,
    pub findings: Vec<Finding>,
    pub dimensioning: Option<DimensioningResult>,
    /// Load-model failures that degraded the run (dimensioning withheld,
    /// load-dependent room checks skipped). Empty on clean requests.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_issues: Vec<DataIssue>,
    /// Version of the catalog snapshot this run was evaluated against.
    pub catalog_version: String,
}

impl ValidationResponse {
    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }

    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }
}
