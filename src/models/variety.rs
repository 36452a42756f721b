use super::zone::Range;
use crate::error::{AgroError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarietyCategory {
    Rice,
    #[serde(alias = "crops")]
    Crop,
    Agroforestry,
}

impl VarietyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarietyCategory::Rice => "rice",
            VarietyCategory::Crop => "crop",
            VarietyCategory::Agroforestry => "agroforestry",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rice" => Some(VarietyCategory::Rice),
            "crop" | "crops" => Some(VarietyCategory::Crop),
            "agroforestry" | "tree" | "trees" => Some(VarietyCategory::Agroforestry),
            _ => None,
        }
    }

    pub fn all() -> &'static [VarietyCategory] {
        &[
            VarietyCategory::Rice,
            VarietyCategory::Crop,
            VarietyCategory::Agroforestry,
        ]
    }
}

impl std::fmt::Display for VarietyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarketValue {
    Good,
    High,
    Premium,
}

impl MarketValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketValue::Good => "Good",
            MarketValue::High => "High",
            MarketValue::Premium => "Premium",
        }
    }

    /// Market tier implied by a free-text description when a catalog entry
    /// does not state one.
    pub fn infer(category: VarietyCategory, description: &str) -> Self {
        let text = description.to_lowercase();
        let has_any = |words: &[&str]| words.iter().any(|w| text.contains(w));
        match category {
            VarietyCategory::Rice => {
                if has_any(&["premium", "export", "aromatic", "basmati"]) {
                    MarketValue::Premium
                } else {
                    MarketValue::High
                }
            }
            VarietyCategory::Crop => {
                if has_any(&["premium", "export", "quality"]) {
                    MarketValue::Premium
                } else {
                    MarketValue::High
                }
            }
            VarietyCategory::Agroforestry => {
                if has_any(&["premium"]) {
                    MarketValue::Premium
                } else if has_any(&["high"]) {
                    MarketValue::High
                } else {
                    MarketValue::Good
                }
            }
        }
    }
}

impl std::fmt::Display for MarketValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterRequirement {
    Low,
    #[default]
    Medium,
    High,
}

impl WaterRequirement {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaterRequirement::Low => "Low",
            WaterRequirement::Medium => "Medium",
            WaterRequirement::High => "High",
        }
    }

    /// Parse descriptions such as "High (1500-2000 mm)" or "1-2 irrigations".
    pub fn from_description(description: &str) -> Self {
        let text = description.to_lowercase();
        let has_any = |words: &[&str]| words.iter().any(|w| text.contains(w));
        if has_any(&["high", "1500", "2000", "5-6 irrigations"]) {
            WaterRequirement::High
        } else if has_any(&["low", "250", "300", "1-2 irrigations"]) {
            WaterRequirement::Low
        } else {
            WaterRequirement::Medium
        }
    }
}

impl std::fmt::Display for WaterRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A candidate rice cultivar, field crop, or tree species with its
/// environmental tolerances and carbon/market profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variety {
    pub id: String,
    pub name: String,
    pub category: VarietyCategory,
    pub zones: Vec<String>,
    /// mm/year
    pub rainfall_range: Range,
    /// °C
    pub temp_range: Range,
    pub ph_range: Range,
    /// tCO₂/ha/yr
    pub carbon_potential: f64,
    pub market_value: MarketValue,
    pub soil_preference: String,
    pub water_requirement: WaterRequirement,
    #[serde(default)]
    pub climate_suitability: String,
    #[serde(default)]
    pub characteristics: String,
    #[serde(default)]
    pub special_features: String,
}

impl Variety {
    pub fn suits_zone(&self, zone_id: &str) -> bool {
        self.zones.iter().any(|z| z == zone_id)
    }

    /// Reject tolerance ranges the scorer cannot divide against.
    pub fn validate_ranges(&self) -> Result<()> {
        for (label, range) in [
            ("rainfall", &self.rainfall_range),
            ("temperature", &self.temp_range),
            ("pH", &self.ph_range),
        ] {
            if !range.is_valid() {
                return Err(AgroError::scoring(
                    &self.id,
                    format!(
                        "invalid {} range [{}, {}]",
                        label, range.min, range.max
                    ),
                ));
            }
        }
        Ok(())
    }
}
