use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::engine::{AlternativeList, BudgetResult, Classification};
use crate::reference::{CropProfile, IrrigationMethod, LocationProfile};

fn classification_cell(classification: Classification) -> Cell {
    let cell = Cell::new(classification.to_string());
    match classification {
        Classification::Safe => cell.fg(Color::Green),
        Classification::ManageableRisk => cell.fg(Color::Yellow),
        Classification::NotViable => cell.fg(Color::Red),
    }
}

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn render_budget_table(result: &BudgetResult) -> String {
    let mut table = base_table();
    table.set_header(vec!["Quantity", "Value"]);
    table.add_row(Row::from(vec![
        Cell::new("Classification"),
        classification_cell(result.classification),
    ]));
    table.add_row(vec![
        "Location".to_string(),
        result.location.clone(),
    ]);
    table.add_row(vec!["Crop".to_string(), result.crop.clone()]);
    table.add_row(vec!["Irrigation method".to_string(), result.method.clone()]);
    table.add_row(vec!["Farm area (ha)".to_string(), format!("{:.2}", result.area_ha)]);
    table.add_row(vec![
        "Available water (m³)".to_string(),
        format!("{:.1}", result.available.total_m3),
    ]);
    table.add_row(vec![
        "  from rainfall (m³)".to_string(),
        format!(
            "{:.1} ({:.0}%)",
            result.available.rainfall_m3,
            result.rainfall_fraction * 100.0
        ),
    ]);
    table.add_row(vec![
        "  from groundwater (m³)".to_string(),
        format!(
            "{:.1} ({:.0}%)",
            result.available.groundwater_m3,
            result.groundwater_fraction * 100.0
        ),
    ]);
    table.add_row(vec![
        "Crop demand, adjusted (m³)".to_string(),
        format!("{:.1}", result.demand.adjusted_m3),
    ]);
    table.add_row(vec!["Budget ratio".to_string(), format!("{:.3}", result.ratio)]);
    table.add_row(vec![
        "Recommended limit (m³)".to_string(),
        format!("{:.1}", result.recommended_limit_m3),
    ]);
    table.add_row(vec![
        "Balance (m³)".to_string(),
        format!("{:+.1}", result.balance_m3),
    ]);
    table.to_string()
}

pub fn render_alternatives_table(list: &AlternativeList) -> String {
    let mut table = base_table();
    table.set_header(vec![
        "Rank",
        "Crop",
        "Category",
        "Projected Demand (m³)",
        "Classification",
        "Score",
    ]);
    for (idx, suggestion) in list.suggestions.iter().enumerate() {
        table.add_row(Row::from(vec![
            Cell::new((idx + 1).to_string()),
            Cell::new(&suggestion.display_name),
            Cell::new(suggestion.category.to_string()),
            Cell::new(format!("{:.1}", suggestion.projected_demand_m3)),
            classification_cell(suggestion.projected_classification),
            Cell::new(format!("{:.3}", suggestion.rank_score)),
        ]));
    }
    let mut rendered = table.to_string();
    if list.all_not_viable {
        rendered.push_str(
            "\nNo crop reaches Manageable Risk under this water supply; \
             showing the least-bad options.",
        );
    }
    rendered
}

pub fn render_crops_table(crops: &[CropProfile]) -> String {
    let mut table = base_table();
    table.set_header(vec![
        "Id",
        "Crop",
        "Category",
        "Water Need (m³/ha)",
        "Min Viable Fraction",
    ]);
    for crop in crops {
        table.add_row(vec![
            crop.id.clone(),
            crop.display_name.clone(),
            crop.category.to_string(),
            format!("{:.0}", crop.water_coefficient_m3_per_ha),
            format!("{:.2}", crop.min_viable_fraction),
        ]);
    }
    table.to_string()
}

pub fn render_locations_table(locations: &[LocationProfile]) -> String {
    let mut table = base_table();
    table.set_header(vec![
        "Id",
        "District",
        "Rainfall (m³/ha)",
        "Groundwater (m³/ha)",
    ]);
    for location in locations {
        table.add_row(vec![
            location.id.clone(),
            location.display_name.clone(),
            format!("{:.0}", location.rainfall_baseline_m3_per_ha),
            format!("{:.0}", location.groundwater_baseline_m3_per_ha),
        ]);
    }
    table.to_string()
}

pub fn render_methods_table(methods: &[IrrigationMethod]) -> String {
    let mut table = base_table();
    table.set_header(vec!["Id", "Method", "Efficiency"]);
    for method in methods {
        table.add_row(vec![
            method.id.clone(),
            method.display_name.clone(),
            format!("{:.2}", method.efficiency),
        ]);
    }
    table.to_string()
}
