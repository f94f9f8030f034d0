use crate::engine::AvailableWater;
use crate::error::EngineError;
use crate::reference::LocationProfile;

/// Scales the location's seasonal baselines by farm area. An override fully
/// replaces the groundwater baseline.
pub fn estimate(
    location: &LocationProfile,
    area_ha: f64,
    groundwater_override_m3_per_ha: Option<f64>,
) -> Result<AvailableWater, EngineError> {
    if !(area_ha > 0.0) {
        return Err(EngineError::invalid(format!(
            "farm area must be positive, got {area_ha} ha"
        )));
    }
    if let Some(override_m3_per_ha) = groundwater_override_m3_per_ha {
        if override_m3_per_ha < 0.0 {
            return Err(EngineError::invalid(format!(
                "groundwater override cannot be negative, got {override_m3_per_ha}"
            )));
        }
    }

    let rainfall_m3 = location.rainfall_baseline_m3_per_ha * area_ha;
    let groundwater_m3 = groundwater_override_m3_per_ha
        .unwrap_or(location.groundwater_baseline_m3_per_ha)
        * area_ha;
    Ok(AvailableWater {
        rainfall_m3,
        groundwater_m3,
        total_m3: rainfall_m3 + groundwater_m3,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn indore() -> LocationProfile {
        LocationProfile {
            id: "indore".to_string(),
            display_name: "Indore".to_string(),
            rainfall_baseline_m3_per_ha: 300.0,
            groundwater_baseline_m3_per_ha: 200.0,
        }
    }

    #[test]
    fn scales_baselines_by_area() {
        let water = estimate(&indore(), 2.0, None).expect("valid input");
        assert_relative_eq!(water.rainfall_m3, 600.0);
        assert_relative_eq!(water.groundwater_m3, 400.0);
        assert_relative_eq!(water.total_m3, 1_000.0);
    }

    #[test]
    fn override_replaces_baseline_instead_of_adding() {
        let water = estimate(&indore(), 2.0, Some(50.0)).expect("valid input");
        assert_relative_eq!(water.groundwater_m3, 100.0);
        assert_relative_eq!(water.total_m3, 700.0);
    }

    #[test]
    fn zero_override_is_allowed() {
        let water = estimate(&indore(), 1.0, Some(0.0)).expect("valid input");
        assert_relative_eq!(water.groundwater_m3, 0.0);
        assert_relative_eq!(water.total_m3, 300.0);
    }

    #[test]
    fn rejects_nonpositive_area() {
        for area in [0.0, -1.5, f64::NAN] {
            assert!(matches!(
                estimate(&indore(), area, None),
                Err(EngineError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn rejects_negative_override() {
        assert!(matches!(
            estimate(&indore(), 1.0, Some(-10.0)),
            Err(EngineError::InvalidInput(_))
        ));
    }
}
