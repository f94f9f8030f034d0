pub mod catalog;
pub mod loader;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::error::{EngineError, ReferenceKind};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CropCategory {
    Cereal,
    Vegetable,
    Legume,
    Oilseed,
    Cash,
}

impl Display for CropCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Cereal => "Cereal",
            Self::Vegetable => "Vegetable",
            Self::Legume => "Legume",
            Self::Oilseed => "Oilseed",
            Self::Cash => "Cash",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown crop category: {0}")]
pub struct CropCategoryParseError(pub String);

impl FromStr for CropCategory {
    type Err = CropCategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cereal" => Ok(Self::Cereal),
            "vegetable" => Ok(Self::Vegetable),
            "legume" | "pulse" => Ok(Self::Legume),
            "oilseed" => Ok(Self::Oilseed),
            "cash" => Ok(Self::Cash),
            _ => Err(CropCategoryParseError(s.to_string())),
        }
    }
}

/// Seasonal water profile of a single crop. Coefficients are m³ per hectare
/// per season.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropProfile {
    pub id: String,
    pub display_name: String,
    pub water_coefficient_m3_per_ha: f64,
    pub min_viable_fraction: f64,
    pub category: CropCategory,
}

/// Seasonal water supply baselines of a district, m³ per hectare.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationProfile {
    pub id: String,
    pub display_name: String,
    pub rainfall_baseline_m3_per_ha: f64,
    pub groundwater_baseline_m3_per_ha: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IrrigationMethod {
    pub id: String,
    pub display_name: String,
    /// Fraction of applied water effectively used, in (0, 1].
    pub efficiency: f64,
}

/// Read-only reference tables, validated once at load. Lookup order within
/// each table follows dataset order, which the ranker relies on for stable
/// tie-breaking.
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    crops: Vec<CropProfile>,
    locations: Vec<LocationProfile>,
    methods: Vec<IrrigationMethod>,
    fingerprint: String,
}

impl ReferenceStore {
    pub fn new(
        crops: Vec<CropProfile>,
        locations: Vec<LocationProfile>,
        methods: Vec<IrrigationMethod>,
    ) -> Result<Self> {
        if crops.is_empty() {
            return Err(anyhow!("dataset holds no crops"));
        }
        if locations.is_empty() {
            return Err(anyhow!("dataset holds no locations"));
        }
        if methods.is_empty() {
            return Err(anyhow!("dataset holds no irrigation methods"));
        }
        for crop in &crops {
            validate_slug("crop", &crop.id)?;
            if crop.water_coefficient_m3_per_ha <= 0.0 {
                return Err(anyhow!(
                    "crop {}: water coefficient must be positive, got {}",
                    crop.id,
                    crop.water_coefficient_m3_per_ha
                ));
            }
            if !(crop.min_viable_fraction > 0.0 && crop.min_viable_fraction <= 1.0) {
                return Err(anyhow!(
                    "crop {}: min viable fraction must be in (0, 1], got {}",
                    crop.id,
                    crop.min_viable_fraction
                ));
            }
        }
        for location in &locations {
            validate_slug("location", &location.id)?;
            if location.rainfall_baseline_m3_per_ha <= 0.0 {
                return Err(anyhow!(
                    "location {}: rainfall baseline must be positive, got {}",
                    location.id,
                    location.rainfall_baseline_m3_per_ha
                ));
            }
            if location.groundwater_baseline_m3_per_ha < 0.0 {
                return Err(anyhow!(
                    "location {}: groundwater baseline cannot be negative, got {}",
                    location.id,
                    location.groundwater_baseline_m3_per_ha
                ));
            }
        }
        for method in &methods {
            validate_slug("irrigation method", &method.id)?;
            if !(method.efficiency > 0.0 && method.efficiency <= 1.0) {
                return Err(anyhow!(
                    "irrigation method {}: efficiency must be in (0, 1], got {}",
                    method.id,
                    method.efficiency
                ));
            }
        }
        reject_duplicates("crop", crops.iter().map(|c| c.id.as_str()))?;
        reject_duplicates("location", locations.iter().map(|l| l.id.as_str()))?;
        reject_duplicates("irrigation method", methods.iter().map(|m| m.id.as_str()))?;

        let fingerprint = dataset_fingerprint(&crops, &locations, &methods);
        Ok(Self {
            crops,
            locations,
            methods,
            fingerprint,
        })
    }

    pub fn lookup_crop(&self, id: &str) -> Option<&CropProfile> {
        let normalized = normalize_id(id);
        self.crops.iter().find(|c| c.id == normalized)
    }

    pub fn lookup_location(&self, id: &str) -> Option<&LocationProfile> {
        let normalized = normalize_id(id);
        self.locations.iter().find(|l| l.id == normalized)
    }

    pub fn lookup_method(&self, id: &str) -> Option<&IrrigationMethod> {
        let normalized = normalize_id(id);
        self.methods.iter().find(|m| m.id == normalized)
    }

    pub fn crop(&self, id: &str) -> Result<&CropProfile, EngineError> {
        self.lookup_crop(id)
            .ok_or_else(|| EngineError::unknown(ReferenceKind::Crop, id))
    }

    pub fn location(&self, id: &str) -> Result<&LocationProfile, EngineError> {
        self.lookup_location(id)
            .ok_or_else(|| EngineError::unknown(ReferenceKind::Location, id))
    }

    pub fn method(&self, id: &str) -> Result<&IrrigationMethod, EngineError> {
        self.lookup_method(id)
            .ok_or_else(|| EngineError::unknown(ReferenceKind::IrrigationMethod, id))
    }

    pub fn all_crops(&self) -> &[CropProfile] {
        &self.crops
    }

    pub fn all_locations(&self) -> &[LocationProfile] {
        &self.locations
    }

    pub fn all_methods(&self) -> &[IrrigationMethod] {
        &self.methods
    }

    /// SHA-256 over the canonical JSON of the loaded tables. Lets operators
    /// confirm which dataset revision produced a recommendation.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace([' ', '-'], "_")
}

fn validate_slug(kind: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(anyhow!("{kind} id cannot be empty"));
    }
    if id != normalize_id(id) {
        return Err(anyhow!(
            "{kind} id must be a lowercase slug, got {id:?}"
        ));
    }
    Ok(())
}

fn reject_duplicates<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = std::collections::BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(anyhow!("duplicate {kind} id: {id}"));
        }
    }
    Ok(())
}

fn dataset_fingerprint(
    crops: &[CropProfile],
    locations: &[LocationProfile],
    methods: &[IrrigationMethod],
) -> String {
    let canonical =
        serde_json::to_string(&(crops, locations, methods)).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}
