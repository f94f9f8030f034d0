//! Built-in reference dataset.
//!
//! Seeded from the government rainfall figures and crop water norms the tool
//! ships with; a dataset file (see `loader`) replaces or extends these tables
//! without a rebuild. All volumes are m³ per hectare per season (1 mm of
//! water over 1 ha = 10 m³).

use super::{CropCategory, CropProfile, IrrigationMethod, LocationProfile};

pub fn builtin_crops() -> Vec<CropProfile> {
    vec![
        crop("rice", "Rice", 12_000.0, 0.65, CropCategory::Cereal),
        crop("wheat", "Wheat", 4_500.0, 0.50, CropCategory::Cereal),
        crop("maize", "Maize", 6_000.0, 0.50, CropCategory::Cereal),
        crop("soybean", "Soybean", 5_000.0, 0.55, CropCategory::Legume),
        crop("gram", "Gram", 3_500.0, 0.45, CropCategory::Legume),
        crop("mustard", "Mustard", 3_000.0, 0.45, CropCategory::Oilseed),
    ]
}

pub fn builtin_locations() -> Vec<LocationProfile> {
    vec![
        location("indore", "Indore", 8_000.0, 3_200.0),
        location("bhopal", "Bhopal", 10_000.0, 4_000.0),
        location("nagpur", "Nagpur", 9_000.0, 3_600.0),
    ]
}

pub fn builtin_methods() -> Vec<IrrigationMethod> {
    vec![
        method("drip", "Drip", 0.90),
        method("sprinkler", "Sprinkler", 0.75),
        method("flood", "Flood", 0.60),
    ]
}

fn crop(
    id: &str,
    display_name: &str,
    coefficient: f64,
    min_viable_fraction: f64,
    category: CropCategory,
) -> CropProfile {
    CropProfile {
        id: id.to_string(),
        display_name: display_name.to_string(),
        water_coefficient_m3_per_ha: coefficient,
        min_viable_fraction,
        category,
    }
}

fn location(id: &str, display_name: &str, rainfall: f64, groundwater: f64) -> LocationProfile {
    LocationProfile {
        id: id.to_string(),
        display_name: display_name.to_string(),
        rainfall_baseline_m3_per_ha: rainfall,
        groundwater_baseline_m3_per_ha: groundwater,
    }
}

fn method(id: &str, display_name: &str, efficiency: f64) -> IrrigationMethod {
    IrrigationMethod {
        id: id.to_string(),
        display_name: display_name.to_string(),
        efficiency,
    }
}
