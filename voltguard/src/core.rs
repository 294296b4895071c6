//! Engine façade: request integrity, per-room fan-out, global pass,
//! dimensioning, response assembly.
//!
//! The engine is a pure computation over a request plus an immutable
//! catalog snapshot. No I/O happens inside an evaluation; the snapshot is
//! captured once up front so a concurrent catalog reload never tears an
//! in-flight run.

use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinSet;

use crate::catalog::{builtin, CatalogError, CatalogStore, RuleCatalog};
use crate::dimensioning::{dimension_from_summaries, RoomLoadSummary};
use crate::schema::{
    Finding, Severity, ValidationRequest, ValidationResponse, Verdict,
};
use crate::validator::{validate_global, validate_room, RoomOutcome};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Request rejected before any rule evaluation.
    #[error("input integrity error: {0}")]
    InputIntegrity(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("failed to parse request JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Request-scoped deadline elapsed between evaluation phases.
    #[error("evaluation deadline exceeded before the {phase} phase")]
    DeadlineExceeded { phase: &'static str },
    #[error("room evaluation task failed: {0}")]
    Internal(String),
}

/// Per-run options. The request itself carries everything the caller
/// asks for; options carry execution concerns only.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluationOptions {
    /// Cooperative cancellation point, checked between phases.
    pub deadline: Option<Instant>,
}

/// Compliance and dimensioning engine over a shared catalog store.
pub struct Engine {
    store: CatalogStore,
}

impl Engine {
    /// Engine backed by the builtin catalog.
    pub fn new() -> Self {
        Self {
            store: CatalogStore::with_catalog(builtin::catalog()),
        }
    }

    pub fn with_catalog(catalog: RuleCatalog) -> Self {
        Self {
            store: CatalogStore::with_catalog(catalog),
        }
    }

    /// Engine with no catalog loaded yet. Evaluations fail with
    /// [`CatalogError::Unavailable`] until [`Engine::reload`] succeeds.
    pub fn cold() -> Self {
        Self {
            store: CatalogStore::empty(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.store.is_loaded()
    }

    /// Validate and atomically publish a new catalog. In-flight
    /// evaluations keep the snapshot they already captured.
    pub fn reload(&self, catalog: RuleCatalog) -> Result<(), CatalogError> {
        catalog.validate()?;
        self.store.replace(catalog);
        Ok(())
    }

    pub async fn evaluate(
        &self,
        request: &ValidationRequest,
    ) -> Result<ValidationResponse, EngineError> {
        self.evaluate_with(request, EvaluationOptions::default())
            .await
    }

    /// Full evaluation: room pass (parallel fan-out), join, global pass,
    /// optional dimensioning.
    pub async fn evaluate_with(
        &self,
        request: &ValidationRequest,
        options: EvaluationOptions,
    ) -> Result<ValidationResponse, EngineError> {
        let catalog = self.store.snapshot()?;
        check_integrity(request)?;

        let jurisdiction = catalog.resolve_jurisdiction(request.postal_code.as_deref());
        tracing::info!(
            installation_id = %request.installation_id,
            rooms = request.rooms.len(),
            %jurisdiction,
            catalog_version = %catalog.version,
            "evaluation started"
        );

        let outcomes = self
            .room_pass(request, Arc::clone(&catalog), &jurisdiction)
            .await?;

        check_deadline(&options, "global validation")?;

        let mut findings: Vec<Finding> = Vec::new();
        let mut data_issues = Vec::new();
        let mut summaries: Vec<Option<RoomLoadSummary>> = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            findings.extend(outcome.findings);
            data_issues.extend(outcome.data_issues);
            summaries.push(outcome.summary);
        }

        let global_rules = catalog.global_rules(&jurisdiction);
        findings.extend(validate_global(
            &request.rooms,
            &summaries,
            &global_rules,
            &catalog,
            request.number_of_people,
        ));

        check_deadline(&options, "dimensioning")?;

        // A load-model failure degrades dimensioning only: the findings
        // above are returned regardless.
        let dimensioning = if request.include_dimensioning && data_issues.is_empty() {
            let resolved: Vec<RoomLoadSummary> = summaries.into_iter().flatten().collect();
            Some(dimension_from_summaries(&resolved, &catalog.dimensioning))
        } else {
            None
        };

        let verdict = if findings.iter().any(|f| f.severity == Severity::Error) {
            Verdict::Fail
        } else {
            Verdict::Pass
        };

        tracing::info!(
            installation_id = %request.installation_id,
            ?verdict,
            findings = findings.len(),
            data_issues = data_issues.len(),
            "evaluation finished"
        );

        Ok(ValidationResponse {
            verdict,
            findings,
            dimensioning,
            data_issues,
            catalog_version: catalog.version.clone(),
        })
    }

    /// Fan the room pass out over the runtime's worker threads and join.
    /// Rooms are independent; results come back in request order.
    async fn room_pass(
        &self,
        request: &ValidationRequest,
        catalog: Arc<RuleCatalog>,
        jurisdiction: &str,
    ) -> Result<Vec<RoomOutcome>, EngineError> {
        let mut set: JoinSet<(usize, RoomOutcome)> = JoinSet::new();
        for (index, room) in request.rooms.iter().cloned().enumerate() {
            let catalog = Arc::clone(&catalog);
            let jurisdiction = jurisdiction.to_string();
            set.spawn(async move {
                let rules = catalog.rules_for(room.room_type, &jurisdiction);
                (index, validate_room(&room, &rules))
            });
        }

        let mut outcomes: Vec<Option<RoomOutcome>> = vec![None; request.rooms.len()];
        while let Some(joined) = set.join_next().await {
            let (index, outcome) = joined.map_err(|e| EngineError::Internal(e.to_string()))?;
            outcomes[index] = Some(outcome);
        }
        Ok(outcomes.into_iter().flatten().collect())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a request from its JSON wire form.
pub fn parse_request(json: &str) -> Result<ValidationRequest, EngineError> {
    Ok(serde_json::from_str(json)?)
}

/// Shape checks that reject a request before any rule runs. These are
/// errors, never findings: the input cannot be evaluated at all.
fn check_integrity(request: &ValidationRequest) -> Result<(), EngineError> {
    if request.installation_id.trim().is_empty() {
        return Err(EngineError::InputIntegrity(
            "installation_id must not be empty".into(),
        ));
    }

    let mut seen = std::collections::HashSet::new();
    for room in &request.rooms {
        if room.room_id.trim().is_empty() {
            return Err(EngineError::InputIntegrity("room with empty room_id".into()));
        }
        if !seen.insert(room.room_id.as_str()) {
            return Err(EngineError::InputIntegrity(format!(
                "duplicate room_id: {}",
                room.room_id
            )));
        }
        if !room.room_area.is_finite() || room.room_area <= 0.0 {
            return Err(EngineError::InputIntegrity(format!(
                "room {}: room_area must be a positive number",
                room.room_id
            )));
        }
    }
    Ok(())
}

fn check_deadline(options: &EvaluationOptions, phase: &'static str) -> Result<(), EngineError> {
    if let Some(deadline) = options.deadline {
        if Instant::now() >= deadline {
            return Err(EngineError::DeadlineExceeded { phase });
        }
    }
    Ok(())
}
