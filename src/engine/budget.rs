use crate::engine::{AvailableWater, Classification, WaterDemand};
use crate::error::EngineError;
use crate::reference::CropProfile;

/// Classifier output before it is stitched into a `BudgetResult`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub ratio: f64,
    pub classification: Classification,
    pub recommended_limit_m3: f64,
    pub balance_m3: f64,
    pub rainfall_fraction: f64,
    pub groundwater_fraction: f64,
}

/// Ordered threshold rules, first match wins. Boundaries are inclusive on
/// the lower bound of each tier, so an exact tie lands in the better tier.
pub fn classify(ratio: f64, min_viable_fraction: f64, safe_threshold: f64) -> Classification {
    if ratio >= safe_threshold {
        Classification::Safe
    } else if ratio >= min_viable_fraction {
        Classification::ManageableRisk
    } else {
        Classification::NotViable
    }
}

/// Compares availability to demand and derives the recommendation. A zero
/// adjusted demand leaves the budget ratio undefined and is rejected as a
/// dataset problem rather than classified.
pub fn evaluate(
    available: &AvailableWater,
    demand: &WaterDemand,
    crop: &CropProfile,
    safe_threshold: f64,
) -> Result<Evaluation, EngineError> {
    if demand.adjusted_m3 == 0.0 {
        return Err(EngineError::degenerate(format!(
            "crop {} requires no water under these inputs; budget ratio is undefined",
            crop.id
        )));
    }

    let ratio = available.total_m3 / demand.adjusted_m3;
    let classification = classify(ratio, crop.min_viable_fraction, safe_threshold);
    let recommended_limit_m3 = match classification {
        // Use exactly what is needed; surplus stays unallocated.
        Classification::Safe => demand.adjusted_m3,
        // Under scarcity the farmer applies everything there is.
        Classification::ManageableRisk | Classification::NotViable => available.total_m3,
    };
    let (rainfall_fraction, groundwater_fraction) = if available.total_m3 > 0.0 {
        (
            available.rainfall_m3 / available.total_m3,
            available.groundwater_m3 / available.total_m3,
        )
    } else {
        (0.0, 0.0)
    };

    Ok(Evaluation {
        ratio,
        classification,
        recommended_limit_m3,
        balance_m3: available.total_m3 - demand.adjusted_m3,
        rainfall_fraction,
        groundwater_fraction,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::reference::CropCategory;

    fn crop(min_viable_fraction: f64) -> CropProfile {
        CropProfile {
            id: "maize".to_string(),
            display_name: "Maize".to_string(),
            water_coefficient_m3_per_ha: 6_000.0,
            min_viable_fraction,
            category: CropCategory::Cereal,
        }
    }

    fn available(rainfall: f64, groundwater: f64) -> AvailableWater {
        AvailableWater {
            rainfall_m3: rainfall,
            groundwater_m3: groundwater,
            total_m3: rainfall + groundwater,
        }
    }

    fn demand(adjusted: f64) -> WaterDemand {
        WaterDemand {
            raw_m3: adjusted,
            adjusted_m3: adjusted,
        }
    }

    #[test]
    fn exact_match_is_safe_with_demand_as_limit() {
        // rainfall 300 and groundwater 200 per ha over 2 ha; coefficient 400
        // over 2 ha at 0.8 efficiency
        let eval = evaluate(&available(600.0, 400.0), &demand(1_000.0), &crop(0.5), 1.0)
            .expect("well-formed input");
        assert_relative_eq!(eval.ratio, 1.0);
        assert_eq!(eval.classification, Classification::Safe);
        assert_relative_eq!(eval.recommended_limit_m3, 1_000.0);
        assert_relative_eq!(eval.balance_m3, 0.0);
    }

    #[test]
    fn shortfall_above_min_fraction_is_manageable_risk() {
        // coefficient 600 over 2 ha at 0.8 efficiency against the same supply
        let eval = evaluate(&available(600.0, 400.0), &demand(1_500.0), &crop(0.5), 1.0)
            .expect("well-formed input");
        assert_relative_eq!(eval.ratio, 2.0 / 3.0, epsilon = 1e-9);
        assert_eq!(eval.classification, Classification::ManageableRisk);
        assert_relative_eq!(eval.recommended_limit_m3, 1_000.0);
        assert_relative_eq!(eval.balance_m3, -500.0);
    }

    #[test]
    fn shortfall_below_min_fraction_is_not_viable() {
        let eval = evaluate(&available(600.0, 400.0), &demand(2_500.0), &crop(0.5), 1.0)
            .expect("well-formed input");
        assert_relative_eq!(eval.ratio, 0.4);
        assert_eq!(eval.classification, Classification::NotViable);
        assert_relative_eq!(eval.recommended_limit_m3, 1_000.0);
    }

    #[test]
    fn tie_at_min_viable_fraction_stays_manageable() {
        let eval = evaluate(&available(250.0, 250.0), &demand(1_000.0), &crop(0.5), 1.0)
            .expect("well-formed input");
        assert_relative_eq!(eval.ratio, 0.5);
        assert_eq!(eval.classification, Classification::ManageableRisk);
    }

    #[test]
    fn zero_availability_is_not_viable_with_zero_fractions() {
        let eval = evaluate(&available(0.0, 0.0), &demand(1_000.0), &crop(0.5), 1.0)
            .expect("well-formed input");
        assert_relative_eq!(eval.ratio, 0.0);
        assert_eq!(eval.classification, Classification::NotViable);
        assert_relative_eq!(eval.rainfall_fraction, 0.0);
        assert_relative_eq!(eval.groundwater_fraction, 0.0);
    }

    #[test]
    fn zero_demand_is_degenerate_never_divided() {
        let err = evaluate(&available(600.0, 400.0), &demand(0.0), &crop(0.5), 1.0).unwrap_err();
        assert!(matches!(err, EngineError::DegenerateInput(_)));
    }

    #[test]
    fn fractions_sum_to_one_when_water_is_available() {
        let eval = evaluate(&available(731.0, 412.0), &demand(900.0), &crop(0.5), 1.0)
            .expect("well-formed input");
        assert_relative_eq!(
            eval.rainfall_fraction + eval.groundwater_fraction,
            1.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn classification_is_invariant_under_area_scaling() {
        // Scaling both sides by the same positive factor leaves the ratio,
        // and therefore the tier, unchanged.
        for scale in [0.25, 1.0, 7.5] {
            let eval = evaluate(
                &available(600.0 * scale, 400.0 * scale),
                &demand(1_500.0 * scale),
                &crop(0.5),
                1.0,
            )
            .expect("well-formed input");
            assert_relative_eq!(eval.ratio, 2.0 / 3.0, epsilon = 1e-9);
            assert_eq!(eval.classification, Classification::ManageableRisk);
        }
    }
}
