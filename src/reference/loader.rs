use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::catalog::{builtin_crops, builtin_locations, builtin_methods};
use super::{normalize_id, CropProfile, IrrigationMethod, LocationProfile, ReferenceStore};
use crate::config::Config;

/// On-disk dataset shape. Any section left out falls back to the built-in
/// catalog for that table.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatasetFile {
    #[serde(default)]
    pub crops: Vec<CropProfile>,
    #[serde(default)]
    pub locations: Vec<LocationProfile>,
    #[serde(default)]
    pub methods: Vec<IrrigationMethod>,
}

/// One row of a government rainfall export (`District`,
/// `Total_Actual_Rainfall_mm`).
#[derive(Debug, Deserialize)]
struct RainfallRow {
    #[serde(rename = "District")]
    district: String,
    #[serde(rename = "Total_Actual_Rainfall_mm")]
    rainfall_mm: f64,
}

pub fn builtin_store() -> Result<ReferenceStore> {
    ReferenceStore::new(builtin_crops(), builtin_locations(), builtin_methods())
}

/// Builds the store the CLI and server share: dataset file if configured,
/// built-in catalog otherwise, then the optional district rainfall overlay.
pub fn load_reference_store(config: &Config) -> Result<ReferenceStore> {
    let mut crops = builtin_crops();
    let mut locations = builtin_locations();
    let mut methods = builtin_methods();

    if let Some(path) = config.resolved_dataset_path() {
        let dataset = read_dataset_file(&path)?;
        if !dataset.crops.is_empty() {
            crops = dataset.crops;
        }
        if !dataset.locations.is_empty() {
            locations = dataset.locations;
        }
        if !dataset.methods.is_empty() {
            methods = dataset.methods;
        }
        info!("loaded dataset from {}", path.display());
    }

    if let Some(path) = config.resolved_rainfall_csv_path() {
        let updated = apply_rainfall_csv(&mut locations, &path)?;
        info!(
            "applied rainfall overlay from {} ({updated} districts)",
            path.display()
        );
    }

    let store = ReferenceStore::new(crops, locations, methods)?;
    info!(
        "reference store ready: {} crops, {} locations, {} methods, fingerprint {}",
        store.all_crops().len(),
        store.all_locations().len(),
        store.all_methods().len(),
        store.fingerprint()
    );
    Ok(store)
}

pub fn read_dataset_file(path: &Path) -> Result<DatasetFile> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading dataset: {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("failed parsing JSON dataset: {}", path.display()))
}

/// Overlays district rainfall figures onto the location table. Known
/// districts get their rainfall baseline replaced; unseen districts are added
/// with a zero groundwater baseline (the per-request override supplies
/// groundwater for those). Figures arrive in mm and convert at 10 m³/ha per
/// mm. Returns the number of rows applied.
pub fn apply_rainfall_csv(locations: &mut Vec<LocationProfile>, path: &Path) -> Result<usize> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed opening rainfall CSV: {}", path.display()))?;
    let mut applied = 0usize;
    for row in reader.deserialize() {
        let row: RainfallRow =
            row.with_context(|| format!("malformed rainfall row in {}", path.display()))?;
        if row.rainfall_mm <= 0.0 {
            warn!(
                "skipping district {} with non-positive rainfall {}",
                row.district, row.rainfall_mm
            );
            continue;
        }
        let id = normalize_id(&row.district);
        let rainfall_m3_per_ha = row.rainfall_mm * 10.0;
        match locations.iter_mut().find(|l| l.id == id) {
            Some(existing) => existing.rainfall_baseline_m3_per_ha = rainfall_m3_per_ha,
            None => locations.push(LocationProfile {
                id,
                display_name: row.district.trim().to_string(),
                rainfall_baseline_m3_per_ha: rainfall_m3_per_ha,
                groundwater_baseline_m3_per_ha: 0.0,
            }),
        }
        applied += 1;
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp_csv(contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "irrigation-oracle-rainfall-{}.csv",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).expect("create temp csv");
        file.write_all(contents.as_bytes()).expect("write temp csv");
        path
    }

    #[test]
    fn rainfall_overlay_replaces_and_adds_districts() {
        let path = write_temp_csv(
            "District,Total_Actual_Rainfall_mm\nIndore,950\nKolhapur,1400\nDry Town,0\n",
        );
        let mut locations = builtin_locations();
        let applied = apply_rainfall_csv(&mut locations, &path).expect("overlay applies");
        std::fs::remove_file(&path).ok();

        assert_eq!(applied, 2);
        let indore = locations.iter().find(|l| l.id == "indore").unwrap();
        assert_eq!(indore.rainfall_baseline_m3_per_ha, 9_500.0);
        // groundwater baseline survives the overlay
        assert_eq!(indore.groundwater_baseline_m3_per_ha, 3_200.0);
        let kolhapur = locations.iter().find(|l| l.id == "kolhapur").unwrap();
        assert_eq!(kolhapur.rainfall_baseline_m3_per_ha, 14_000.0);
        assert_eq!(kolhapur.groundwater_baseline_m3_per_ha, 0.0);
        assert!(!locations.iter().any(|l| l.id == "dry_town"));
    }

    #[test]
    fn dataset_file_sections_are_optional() {
        let dataset: DatasetFile =
            serde_json::from_str(r#"{ "methods": [] }"#).expect("parses");
        assert!(dataset.crops.is_empty());
        assert!(dataset.locations.is_empty());
        assert!(dataset.methods.is_empty());
    }
}
