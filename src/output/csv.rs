use anyhow::Result;

use crate::engine::{AlternativeList, BudgetResult};

pub fn budget_to_csv(result: &BudgetResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "location",
        "crop",
        "method",
        "area_ha",
        "available_m3",
        "rainfall_m3",
        "groundwater_m3",
        "demand_adjusted_m3",
        "ratio",
        "classification",
        "recommended_limit_m3",
        "balance_m3",
    ])?;
    writer.write_record([
        result.location.clone(),
        result.crop.clone(),
        result.method.clone(),
        format!("{:.2}", result.area_ha),
        format!("{:.2}", result.available.total_m3),
        format!("{:.2}", result.available.rainfall_m3),
        format!("{:.2}", result.available.groundwater_m3),
        format!("{:.2}", result.demand.adjusted_m3),
        format!("{:.4}", result.ratio),
        result.classification.to_string(),
        format!("{:.2}", result.recommended_limit_m3),
        format!("{:.2}", result.balance_m3),
    ])?;
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn alternatives_to_csv(list: &AlternativeList) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "rank",
        "crop",
        "category",
        "projected_demand_m3",
        "projected_classification",
        "rank_score",
        "fallback",
    ])?;
    for (idx, suggestion) in list.suggestions.iter().enumerate() {
        writer.write_record([
            (idx + 1).to_string(),
            suggestion.crop.clone(),
            suggestion.category.to_string(),
            format!("{:.2}", suggestion.projected_demand_m3),
            suggestion.projected_classification.to_string(),
            format!("{:.4}", suggestion.rank_score),
            list.all_not_viable.to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
