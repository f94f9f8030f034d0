use crate::engine::WaterDemand;
use crate::error::EngineError;
use crate::reference::{CropProfile, IrrigationMethod};

/// Raw demand is the crop coefficient scaled by area; the adjusted figure
/// divides by the method's efficiency, since less efficient delivery must
/// apply more water for the same usable amount.
pub fn estimate(
    crop: &CropProfile,
    area_ha: f64,
    method: &IrrigationMethod,
) -> Result<WaterDemand, EngineError> {
    if !(area_ha > 0.0) {
        return Err(EngineError::invalid(format!(
            "farm area must be positive, got {area_ha} ha"
        )));
    }
    if !(method.efficiency > 0.0 && method.efficiency <= 1.0) {
        return Err(EngineError::invalid(format!(
            "irrigation efficiency must be in (0, 1], got {}",
            method.efficiency
        )));
    }

    let raw_m3 = crop.water_coefficient_m3_per_ha * area_ha;
    Ok(WaterDemand {
        raw_m3,
        adjusted_m3: raw_m3 / method.efficiency,
    })
}
