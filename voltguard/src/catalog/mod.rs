//! Rule catalog: versioned, declarative electrical-code rules.
//!
//! Rules are data, not code. Each rule is a tagged variant consumed by an
//! exhaustive dispatch in the validators, so a catalog can be authored in
//! JSON, reviewed like configuration, and hot-reloaded without touching
//! evaluation logic. Dimensioning tables (demand-factor bands, breaker
//! ladder, panel modules) travel with the catalog for the same reason.

pub mod builtin;

use std::path::Path;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::{RoomType, Severity};

/// Jurisdiction applied when the postal code is missing or maps to a
/// region the catalog has no specific rules for.
pub const DEFAULT_JURISDICTION: &str = "FR";

fn default_true() -> bool {
    true
}

fn default_one() -> u32 {
    1
}

/// Check carried by a rule. The tag is the rule kind of the code text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RuleCheck {
    /// Room must contain at least `min_quantity` of `equipment_type`.
    MandatoryPresence {
        equipment_type: String,
        #[serde(default = "default_one")]
        min_quantity: u32,
    },

    /// Room must not exceed `limit` of `equipment_type`.
    MaxQuantity { equipment_type: String, limit: u32 },

    /// Room must have at least `min_dedicated` dedicated circuits.
    MinCircuits { min_dedicated: u32 },

    /// Room connected load thresholds: WARNING above `soft_watts`,
    /// ERROR above `hard_watts`. The rule's own severity is ignored.
    LoadLimit { soft_watts: u64, hard_watts: u64 },

    /// Installation-wide circuit budget of the distribution panel.
    GlobalPanelLimit { max_circuits: u32 },
}

impl RuleCheck {
    pub fn is_global(&self) -> bool {
        matches!(self, RuleCheck::GlobalPanelLimit { .. })
    }

    /// Ordering rank within a room pass: presence rules come first, then
    /// quantity/load rules. Part of the output contract.
    fn rank(&self) -> u8 {
        match self {
            RuleCheck::MandatoryPresence { .. } => 0,
            _ => 1,
        }
    }
}

/// One catalog rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Stable identifier referenced by findings, e.g. `kitchen.oven_circuit`.
    pub id: String,
    /// i18n key for the finding message.
    pub message_key: String,
    pub severity: Severity,
    /// Room types the rule applies to. Empty means every room type.
    /// Ignored for global rules.
    #[serde(default)]
    pub room_types: Vec<RoomType>,
    /// Restrict the rule to one jurisdiction. None applies everywhere.
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub check: RuleCheck,
}

impl Rule {
    fn applies_to_room(&self, room_type: RoomType) -> bool {
        self.room_types.is_empty() || self.room_types.contains(&room_type)
    }

    fn applies_in(&self, jurisdiction: &str) -> bool {
        match &self.jurisdiction {
            None => true,
            Some(j) => j == jurisdiction,
        }
    }
}

/// One demand-factor band, bracket-style: `span_watts` of connected load
/// scaled by `factor_percent`. The last band has `span_watts: None` and
/// covers the remainder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandBand {
    pub span_watts: Option<u64>,
    pub factor_percent: u64,
}

/// Advisory socket provisioning per occupant for one room type:
/// minimum sockets = ceil(people / occupants_per_socket).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancySockets {
    pub room_type: RoomType,
    pub occupants_per_socket: u32,
}

/// Dimensioning tables. Configuration, not policy: jurisdictions tune
/// these alongside their rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensioningConfig {
    pub nominal_voltage: u32,
    /// Nominal capacity of one shared circuit (16 A at 230 V by default).
    pub shared_circuit_capacity_watts: u64,
    pub demand_bands: Vec<DemandBand>,
    /// Ascending main-breaker rating ladder in amperes.
    pub breaker_ladder_amps: Vec<u32>,
    /// Ascending standard panel sizes in ways.
    pub panel_module_ways: Vec<u32>,
    #[serde(default)]
    pub occupancy_sockets: Vec<OccupancySockets>,
}

impl Default for DimensioningConfig {
    fn default() -> Self {
        builtin::dimensioning_config()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("no rule catalog loaded")]
    Unavailable,
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// Immutable rule catalog snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleCatalog {
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "Utc::now")]
    pub loaded_at: DateTime<Utc>,
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub dimensioning: DimensioningConfig,
}

impl RuleCatalog {
    /// Parse and validate a catalog from its JSON form.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let catalog: RuleCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Structural checks applied before a catalog may be published.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.version.trim().is_empty() {
            return Err(CatalogError::Invalid("version must not be empty".into()));
        }
        for rule in &self.rules {
            if rule.id.trim().is_empty() {
                return Err(CatalogError::Invalid("rule with empty id".into()));
            }
            if let RuleCheck::LoadLimit {
                soft_watts,
                hard_watts,
            } = rule.check
            {
                if hard_watts < soft_watts {
                    return Err(CatalogError::Invalid(format!(
                        "rule {}: hard_watts below soft_watts",
                        rule.id
                    )));
                }
            }
        }
        let d = &self.dimensioning;
        if d.nominal_voltage == 0 {
            return Err(CatalogError::Invalid("nominal_voltage must be > 0".into()));
        }
        if d.shared_circuit_capacity_watts == 0 {
            return Err(CatalogError::Invalid(
                "shared_circuit_capacity_watts must be > 0".into(),
            ));
        }
        if !is_ascending(&d.breaker_ladder_amps) {
            return Err(CatalogError::Invalid(
                "breaker_ladder_amps must be non-empty and ascending".into(),
            ));
        }
        if !is_ascending(&d.panel_module_ways) {
            return Err(CatalogError::Invalid(
                "panel_module_ways must be non-empty and ascending".into(),
            ));
        }
        match d.demand_bands.split_last() {
            None => {
                return Err(CatalogError::Invalid(
                    "demand_bands must not be empty".into(),
                ))
            }
            Some((last, rest)) => {
                if last.span_watts.is_some() {
                    return Err(CatalogError::Invalid(
                        "last demand band must be unbounded (span_watts: null)".into(),
                    ));
                }
                if rest.iter().any(|b| b.span_watts.is_none()) {
                    return Err(CatalogError::Invalid(
                        "only the last demand band may be unbounded".into(),
                    ));
                }
                if d.demand_bands
                    .iter()
                    .any(|b| b.factor_percent == 0 || b.factor_percent > 100)
                {
                    return Err(CatalogError::Invalid(
                        "demand factors must be within 1..=100 percent".into(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Map a postal code to the jurisdiction whose rules apply. Unknown or
    /// missing codes fall back to [`DEFAULT_JURISDICTION`]; the fallback is
    /// logged, never reported as a finding.
    pub fn resolve_jurisdiction(&self, postal_code: Option<&str>) -> String {
        let Some(postal) = postal_code else {
            return DEFAULT_JURISDICTION.to_string();
        };
        let Some(region) = region_of(postal) else {
            tracing::warn!(postal, "unparseable postal code, using default jurisdiction");
            return DEFAULT_JURISDICTION.to_string();
        };
        if self
            .rules
            .iter()
            .any(|r| r.jurisdiction.as_deref() == Some(region.as_str()))
        {
            region
        } else {
            tracing::debug!(
                postal,
                region,
                "no jurisdiction-specific rules, using default"
            );
            DEFAULT_JURISDICTION.to_string()
        }
    }

    /// Room-scope rules for one room type under one jurisdiction, in
    /// evaluation order: mandatory-presence rules first, then
    /// quantity/load rules, each group in catalog order.
    pub fn rules_for(&self, room_type: RoomType, jurisdiction: &str) -> Vec<&Rule> {
        let mut rules: Vec<&Rule> = self
            .rules
            .iter()
            .filter(|r| r.enabled && !r.check.is_global())
            .filter(|r| r.applies_to_room(room_type) && r.applies_in(jurisdiction))
            .collect();
        rules.sort_by_key(|r| r.check.rank());
        rules
    }

    /// Installation-wide rules under one jurisdiction, in catalog order.
    pub fn global_rules(&self, jurisdiction: &str) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|r| r.enabled && r.check.is_global() && r.applies_in(jurisdiction))
            .collect()
    }

    pub fn occupancy_for(&self, room_type: RoomType) -> Option<&OccupancySockets> {
        self.dimensioning
            .occupancy_sockets
            .iter()
            .find(|o| o.room_type == room_type)
    }
}

fn is_ascending(values: &[u32]) -> bool {
    !values.is_empty() && values.windows(2).all(|w| w[0] < w[1])
}

/// French postal codes map to a department region, e.g. `75011` -> `FR-75`.
fn region_of(postal: &str) -> Option<String> {
    let trimmed = postal.trim();
    if trimmed.len() < 2 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(format!("FR-{}", &trimmed[..2]))
}

/// Process-wide catalog snapshot holder.
///
/// Readers capture an `Arc` to the current catalog and evaluate against
/// that snapshot; `replace` publishes a fully built catalog in one store,
/// so in-flight evaluations never observe a partial reload.
pub struct CatalogStore {
    inner: RwLock<Option<Arc<RuleCatalog>>>,
}

impl CatalogStore {
    /// Cold store: `snapshot` fails until a catalog is published.
    pub fn empty() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    pub fn with_catalog(catalog: RuleCatalog) -> Self {
        Self {
            inner: RwLock::new(Some(Arc::new(catalog))),
        }
    }

    pub fn is_loaded(&self) -> bool {
        match self.inner.read() {
            Ok(guard) => guard.is_some(),
            Err(poisoned) => poisoned.into_inner().is_some(),
        }
    }

    /// Capture the current snapshot.
    pub fn snapshot(&self) -> Result<Arc<RuleCatalog>, CatalogError> {
        let guard = match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.clone().ok_or(CatalogError::Unavailable)
    }

    /// Atomically publish a new catalog. The previous snapshot stays alive
    /// for evaluations that already captured it.
    pub fn replace(&self, catalog: RuleCatalog) {
        let version = catalog.version.clone();
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(Arc::new(catalog));
        tracing::info!(version, "rule catalog published");
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::with_catalog(builtin::catalog())
    }
}
