use crate::config::EngineConfig;
use crate::engine::{
    budget, demand, AlternativeList, AlternativeSuggestion, AvailableWater, Classification,
};
use crate::error::EngineError;
use crate::reference::{IrrigationMethod, ReferenceStore};

/// Scores every catalog crop except the excluded one against a fixed
/// availability figure and returns the top-K shortlist. Ordering: rank score
/// descending, then adjusted demand ascending, then dataset order.
pub fn rank(
    store: &ReferenceStore,
    engine: &EngineConfig,
    available: &AvailableWater,
    area_ha: f64,
    method: &IrrigationMethod,
    exclude_crop_id: &str,
) -> Result<AlternativeList, EngineError> {
    let mut candidates = Vec::new();
    for crop in store.all_crops() {
        if crop.id == exclude_crop_id {
            continue;
        }
        let projected = demand::estimate(crop, area_ha, method)?;
        if projected.adjusted_m3 == 0.0 {
            return Err(EngineError::degenerate(format!(
                "catalog crop {} projects zero demand; it cannot be ranked",
                crop.id
            )));
        }
        let rank_score = available.total_m3 / projected.adjusted_m3;
        candidates.push(AlternativeSuggestion {
            crop: crop.id.clone(),
            display_name: crop.display_name.clone(),
            category: crop.category,
            projected_demand_m3: projected.adjusted_m3,
            projected_classification: budget::classify(
                rank_score,
                crop.min_viable_fraction,
                engine.safe_threshold,
            ),
            rank_score,
        });
    }

    // Vec::sort_by is stable, so dataset order survives full ties.
    candidates.sort_by(|a, b| {
        b.rank_score
            .total_cmp(&a.rank_score)
            .then(a.projected_demand_m3.total_cmp(&b.projected_demand_m3))
    });

    let k = engine.shortlist_size.max(1);
    let viable: Vec<AlternativeSuggestion> = candidates
        .iter()
        .filter(|c| c.projected_classification != Classification::NotViable)
        .take(k)
        .cloned()
        .collect();

    if viable.is_empty() {
        // Guidance over an empty answer: the least-bad crops, flagged.
        candidates.truncate(k);
        return Ok(AlternativeList {
            suggestions: candidates,
            all_not_viable: true,
        });
    }
    Ok(AlternativeList {
        suggestions: viable,
        all_not_viable: false,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::reference::{CropCategory, CropProfile, LocationProfile};

    fn crop(id: &str, coefficient: f64, min_fraction: f64) -> CropProfile {
        CropProfile {
            id: id.to_string(),
            display_name: id.to_string(),
            water_coefficient_m3_per_ha: coefficient,
            min_viable_fraction: min_fraction,
            category: CropCategory::Cereal,
        }
    }

    fn store_with(crops: Vec<CropProfile>) -> ReferenceStore {
        ReferenceStore::new(
            crops,
            vec![LocationProfile {
                id: "indore".to_string(),
                display_name: "Indore".to_string(),
                rainfall_baseline_m3_per_ha: 8_000.0,
                groundwater_baseline_m3_per_ha: 3_200.0,
            }],
            vec![flood()],
        )
        .expect("valid store")
    }

    fn flood() -> IrrigationMethod {
        IrrigationMethod {
            id: "flood".to_string(),
            display_name: "Flood".to_string(),
            efficiency: 1.0,
        }
    }

    fn engine(k: usize) -> EngineConfig {
        EngineConfig {
            safe_threshold: 1.0,
            shortlist_size: k,
        }
    }

    fn available(total: f64) -> AvailableWater {
        AvailableWater {
            rainfall_m3: total,
            groundwater_m3: 0.0,
            total_m3: total,
        }
    }

    #[test]
    fn orders_by_score_descending() {
        let store = store_with(vec![
            crop("rice", 12_000.0, 0.65),
            crop("wheat", 4_500.0, 0.5),
            crop("maize", 6_000.0, 0.5),
        ]);
        let list = rank(&store, &engine(3), &available(6_000.0), 1.0, &flood(), "rice")
            .expect("ranker runs");
        assert!(!list.all_not_viable);
        let ids: Vec<&str> = list.suggestions.iter().map(|s| s.crop.as_str()).collect();
        assert_eq!(ids, vec!["wheat", "maize"]);
        for pair in list.suggestions.windows(2) {
            assert!(pair[0].rank_score >= pair[1].rank_score);
        }
    }

    #[test]
    fn excludes_the_requested_crop() {
        let store = store_with(vec![crop("rice", 12_000.0, 0.65), crop("wheat", 4_500.0, 0.5)]);
        let list = rank(&store, &engine(3), &available(20_000.0), 1.0, &flood(), "wheat")
            .expect("ranker runs");
        assert!(list.suggestions.iter().all(|s| s.crop != "wheat"));
    }

    #[test]
    fn equal_scores_break_ties_toward_lower_demand() {
        // Same coefficient means the same score; the tie must prefer the
        // thriftier entry, which here is also the same figure, so dataset
        // order decides. Distinct coefficients with equal scores cannot
        // happen under one availability figure, so exercise the stable path.
        let store = store_with(vec![
            crop("first", 5_000.0, 0.5),
            crop("second", 5_000.0, 0.5),
            crop("third", 4_000.0, 0.5),
        ]);
        let list = rank(&store, &engine(3), &available(10_000.0), 1.0, &flood(), "none")
            .expect("ranker runs");
        let ids: Vec<&str> = list.suggestions.iter().map(|s| s.crop.as_str()).collect();
        assert_eq!(ids, vec!["third", "first", "second"]);
    }

    #[test]
    fn truncates_to_shortlist_size() {
        let store = store_with(vec![
            crop("a", 1_000.0, 0.5),
            crop("b", 1_100.0, 0.5),
            crop("c", 1_200.0, 0.5),
            crop("d", 1_300.0, 0.5),
        ]);
        let list = rank(&store, &engine(2), &available(5_000.0), 1.0, &flood(), "none")
            .expect("ranker runs");
        assert_eq!(list.suggestions.len(), 2);
    }

    #[test]
    fn scarcity_still_produces_a_marked_fallback_list() {
        let store = store_with(vec![
            crop("rice", 12_000.0, 0.65),
            crop("maize", 6_000.0, 0.5),
        ]);
        let list = rank(&store, &engine(3), &available(100.0), 1.0, &flood(), "wheat")
            .expect("ranker runs");
        assert!(list.all_not_viable);
        assert_eq!(list.suggestions.len(), 2);
        assert!(list
            .suggestions
            .iter()
            .all(|s| s.projected_classification == Classification::NotViable));
        // least demanding crop ranks first under uniform scarcity
        assert_eq!(list.suggestions[0].crop, "maize");
    }

    #[test]
    fn safe_entries_rank_above_manageable_risk() {
        let store = store_with(vec![
            crop("thirsty", 9_000.0, 0.5),
            crop("frugal", 4_000.0, 0.5),
        ]);
        let list = rank(&store, &engine(3), &available(6_000.0), 1.0, &flood(), "none")
            .expect("ranker runs");
        assert_eq!(list.suggestions[0].crop, "frugal");
        assert_eq!(
            list.suggestions[0].projected_classification,
            Classification::Safe
        );
        assert_eq!(
            list.suggestions[1].projected_classification,
            Classification::ManageableRisk
        );
        assert_relative_eq!(list.suggestions[0].rank_score, 1.5);
    }
}
