pub mod availability;
pub mod budget;
pub mod demand;
pub mod ranker;

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::reference::{CropCategory, ReferenceStore};

/// Raw request collected by the presentation side. Request-scoped; built
/// fresh per evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetInput {
    pub location: String,
    pub crop: String,
    pub area_ha: f64,
    pub method: String,
    /// Replaces (never adds to) the location's groundwater baseline, m³/ha.
    pub groundwater_override_m3_per_ha: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AvailableWater {
    pub rainfall_m3: f64,
    pub groundwater_m3: f64,
    pub total_m3: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WaterDemand {
    pub raw_m3: f64,
    pub adjusted_m3: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Safe,
    ManageableRisk,
    NotViable,
}

impl Classification {
    pub fn is_safe(self) -> bool {
        matches!(self, Self::Safe)
    }
}

impl Display for Classification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Safe => "Safe",
            Self::ManageableRisk => "Manageable Risk",
            Self::NotViable => "Not Viable",
        };
        write!(f, "{display}")
    }
}

/// Fully evaluated water budget for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetResult {
    pub location: String,
    pub crop: String,
    pub method: String,
    pub area_ha: f64,
    pub available: AvailableWater,
    pub demand: WaterDemand,
    pub ratio: f64,
    pub classification: Classification,
    /// Water the engine advises actually applying, m³.
    pub recommended_limit_m3: f64,
    /// Signed; positive means surplus.
    pub balance_m3: f64,
    pub rainfall_fraction: f64,
    pub groundwater_fraction: f64,
    pub evaluated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeSuggestion {
    pub crop: String,
    pub display_name: String,
    pub category: CropCategory,
    pub projected_demand_m3: f64,
    pub projected_classification: Classification,
    pub rank_score: f64,
}

/// Ranked shortlist. When no candidate reaches Manageable Risk the list still
/// carries the least-bad crops, flagged so the caller can label the fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeList {
    pub suggestions: Vec<AlternativeSuggestion>,
    pub all_not_viable: bool,
}

/// Runs the full pipeline: resolve references, estimate availability and
/// demand, classify. Either returns a fully populated result or fails with a
/// deterministic input error.
pub fn compute_budget(
    store: &ReferenceStore,
    engine: &EngineConfig,
    input: &BudgetInput,
) -> Result<BudgetResult, EngineError> {
    let location = store.location(&input.location)?;
    let crop = store.crop(&input.crop)?;
    let method = store.method(&input.method)?;

    let available = availability::estimate(
        location,
        input.area_ha,
        input.groundwater_override_m3_per_ha,
    )?;
    let demand = demand::estimate(crop, input.area_ha, method)?;
    let evaluation = budget::evaluate(&available, &demand, crop, engine.safe_threshold)?;

    Ok(BudgetResult {
        location: location.id.clone(),
        crop: crop.id.clone(),
        method: method.id.clone(),
        area_ha: input.area_ha,
        available,
        demand,
        ratio: evaluation.ratio,
        classification: evaluation.classification,
        recommended_limit_m3: evaluation.recommended_limit_m3,
        balance_m3: evaluation.balance_m3,
        rainfall_fraction: evaluation.rainfall_fraction,
        groundwater_fraction: evaluation.groundwater_fraction,
        evaluated_at: Utc::now(),
    })
}

/// Scores every other catalog crop against the availability figure the
/// budget was computed from. Intended for results that are not Safe.
pub fn suggest_alternatives(
    store: &ReferenceStore,
    engine: &EngineConfig,
    result: &BudgetResult,
    input: &BudgetInput,
) -> Result<AlternativeList, EngineError> {
    let method = store.method(&input.method)?;
    ranker::rank(
        store,
        engine,
        &result.available,
        input.area_ha,
        method,
        &result.crop,
    )
}
