use crate::error::{AgroError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VegetationHealth {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl VegetationHealth {
    pub fn from_ndvi(ndvi: f64) -> Self {
        if ndvi > 0.6 {
            VegetationHealth::Excellent
        } else if ndvi > 0.4 {
            VegetationHealth::Good
        } else if ndvi > 0.2 {
            VegetationHealth::Fair
        } else {
            VegetationHealth::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VegetationHealth::Excellent => "Excellent",
            VegetationHealth::Good => "Good",
            VegetationHealth::Fair => "Fair",
            VegetationHealth::Poor => "Poor",
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, VegetationHealth::Good | VegetationHealth::Excellent)
    }
}

impl std::fmt::Display for VegetationHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhStatus {
    VeryAcidic,
    Acidic,
    SlightlyAcidic,
    Neutral,
    SlightlyAlkaline,
    Alkaline,
    VeryAlkaline,
}

impl PhStatus {
    pub fn from_ph(ph: f64) -> Self {
        if ph < 5.5 {
            PhStatus::VeryAcidic
        } else if ph < 6.0 {
            PhStatus::Acidic
        } else if ph < 6.8 {
            PhStatus::SlightlyAcidic
        } else if ph <= 7.2 {
            PhStatus::Neutral
        } else if ph <= 7.8 {
            PhStatus::SlightlyAlkaline
        } else if ph <= 8.5 {
            PhStatus::Alkaline
        } else {
            PhStatus::VeryAlkaline
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhStatus::VeryAcidic => "Very Acidic",
            PhStatus::Acidic => "Acidic",
            PhStatus::SlightlyAcidic => "Slightly Acidic",
            PhStatus::Neutral => "Neutral",
            PhStatus::SlightlyAlkaline => "Slightly Alkaline",
            PhStatus::Alkaline => "Alkaline",
            PhStatus::VeryAlkaline => "Very Alkaline",
        }
    }
}

impl std::fmt::Display for PhStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NutrientStatus {
    Excellent,
    Good,
    Moderate,
    Poor,
    Variable,
}

impl NutrientStatus {
    /// Classify from soil organic carbon (%) and CEC (mmol(c)/kg).
    pub fn from_soc_cec(soc: f64, cec: f64) -> Self {
        let soc_low = soc < 1.0;
        let soc_medium = (1.0..3.0).contains(&soc);
        let soc_high = soc >= 3.0;

        let cec_low = cec < 100.0;
        let cec_medium = (100.0..250.0).contains(&cec);
        let cec_high = cec >= 250.0;

        if soc_high && cec_high {
            NutrientStatus::Excellent
        } else if (soc_high && cec_medium) || (soc_medium && cec_high) {
            NutrientStatus::Good
        } else if soc_medium && cec_medium {
            NutrientStatus::Moderate
        } else if soc_low || cec_low {
            NutrientStatus::Poor
        } else {
            NutrientStatus::Variable
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "excellent" => Some(NutrientStatus::Excellent),
            "good" => Some(NutrientStatus::Good),
            "moderate" | "medium" => Some(NutrientStatus::Moderate),
            "poor" | "low" => Some(NutrientStatus::Poor),
            "variable" => Some(NutrientStatus::Variable),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientStatus::Excellent => "Excellent",
            NutrientStatus::Good => "Good",
            NutrientStatus::Moderate => "Moderate",
            NutrientStatus::Poor => "Poor",
            NutrientStatus::Variable => "Variable",
        }
    }

    pub fn is_rich(&self) -> bool {
        matches!(self, NutrientStatus::Good | NutrientStatus::Excellent)
    }
}

impl std::fmt::Display for NutrientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregated climate, vegetation and soil summary for one farm.
///
/// Built once per analysis by `FarmProfileBuilder` and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmProfile {
    pub farm_id: String,
    pub lat: f64,
    pub lon: f64,

    // Climate
    pub total_rainfall: f64,
    pub rainy_days: u32,
    pub avg_temp: f64,
    pub avg_humidity: f64,
    pub kharif_rainfall: f64,
    pub rabi_rainfall: f64,

    // Vegetation
    pub ndvi_mean: f64,
    pub evi_mean: f64,
    pub lai_mean: f64,
    pub vegetation_health: VegetationHealth,

    // Soil
    pub soil_ph: f64,
    pub ph_status: PhStatus,
    pub clay_pct: f64,
    pub sand_pct: f64,
    pub silt_pct: f64,
    pub soc: f64,
    pub cec: f64,
    pub texture: String,
    pub nutrient_status: NutrientStatus,

    // Stress
    pub heat_stress_days: u32,
    pub drought_stress_days: u32,
    pub temp_variability: f64,

    // Trailing 30 days
    pub recent_rainfall: f64,
    pub recent_avg_temp: f64,
    pub recent_avg_humidity: f64,
}

impl FarmProfile {
    /// Field-name → value map handed to report and scheme-matching code.
    pub fn to_map(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(AgroError::InvalidData(format!(
                "farm profile serialized to non-object value: {}",
                other
            ))),
        }
    }
}
