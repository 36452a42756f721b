//! Shared test data for the logic modules.

use crate::models::{
    FarmProfile, MarketValue, NutrientStatus, PhStatus, Range, Variety, VarietyCategory,
    VegetationHealth, WaterRequirement,
};

pub const ZONE_ID: &str = "Zone_10_Southern_Plateau";

/// A Deccan farm with no bonuses and no stress: 800 mm, 26 °C, pH 6.8.
pub fn profile() -> FarmProfile {
    FarmProfile {
        farm_id: "FARM_TEST".into(),
        lat: 16.0,
        lon: 77.0,
        total_rainfall: 800.0,
        rainy_days: 70,
        avg_temp: 26.0,
        avg_humidity: 62.0,
        kharif_rainfall: 600.0,
        rabi_rainfall: 120.0,
        ndvi_mean: 0.35,
        evi_mean: 0.25,
        lai_mean: 1.4,
        vegetation_health: VegetationHealth::Fair,
        soil_ph: 6.8,
        ph_status: PhStatus::Neutral,
        clay_pct: 32.0,
        sand_pct: 35.0,
        silt_pct: 33.0,
        soc: 1.2,
        cec: 150.0,
        texture: "Clay Loam".into(),
        nutrient_status: NutrientStatus::Moderate,
        heat_stress_days: 0,
        drought_stress_days: 120,
        temp_variability: 3.1,
        recent_rainfall: 40.0,
        recent_avg_temp: 27.0,
        recent_avg_humidity: 60.0,
    }
}

/// A variety whose ranges all contain [`profile`], with no bonuses of its own.
pub fn variety(id: &str, category: VarietyCategory) -> Variety {
    Variety {
        id: id.into(),
        name: format!("{} test variety", id),
        category,
        zones: vec![ZONE_ID.into()],
        rainfall_range: Range::new(600.0, 1200.0),
        temp_range: Range::new(20.0, 32.0),
        ph_range: Range::new(6.0, 7.5),
        carbon_potential: 3.0,
        market_value: MarketValue::Good,
        soil_preference: "Red".into(),
        water_requirement: WaterRequirement::Medium,
        climate_suitability: String::new(),
        characteristics: String::new(),
        special_features: String::new(),
    }
}
