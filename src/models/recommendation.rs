use super::variety::{MarketValue, Variety, VarietyCategory, WaterRequirement};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub label: String,
    pub value: String,
    pub source: String,
}

impl DataPoint {
    pub fn new(label: &str, value: impl std::fmt::Display, source: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            source: source.to_string(),
        }
    }
}

/// A variety that cleared the suitability threshold for one farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub variety_id: String,
    pub variety_name: String,
    pub category: VarietyCategory,
    pub suitability_score: f64,
    /// Display-only derating of the score.
    pub confidence: f64,
    pub carbon_potential: f64,
    pub market_value: MarketValue,
    pub zones: Vec<String>,
    pub water_requirement: WaterRequirement,
    pub soil_preference: String,
    pub climate_suitability: String,
    pub characteristics: String,
    pub special_features: String,
}

impl Recommendation {
    pub fn new(variety: &Variety, suitability_score: f64, confidence_factor: f64) -> Self {
        Self {
            variety_id: variety.id.clone(),
            variety_name: variety.name.clone(),
            category: variety.category,
            suitability_score,
            confidence: suitability_score * confidence_factor,
            carbon_potential: variety.carbon_potential,
            market_value: variety.market_value,
            zones: variety.zones.clone(),
            water_requirement: variety.water_requirement,
            soil_preference: variety.soil_preference.clone(),
            climate_suitability: variety.climate_suitability.clone(),
            characteristics: variety.characteristics.clone(),
            special_features: variety.special_features.clone(),
        }
    }
}

/// Ranked recommendations, one list per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub rice: Vec<Recommendation>,
    pub crop: Vec<Recommendation>,
    pub agroforestry: Vec<Recommendation>,
}

impl RecommendationSet {
    pub fn get(&self, category: VarietyCategory) -> &[Recommendation] {
        match category {
            VarietyCategory::Rice => &self.rice,
            VarietyCategory::Crop => &self.crop,
            VarietyCategory::Agroforestry => &self.agroforestry,
        }
    }

    pub fn set(&mut self, category: VarietyCategory, recommendations: Vec<Recommendation>) {
        match category {
            VarietyCategory::Rice => self.rice = recommendations,
            VarietyCategory::Crop => self.crop = recommendations,
            VarietyCategory::Agroforestry => self.agroforestry = recommendations,
        }
    }

    /// The `rank`-th (0-based) entry of a category, if present.
    pub fn ranked(&self, category: VarietyCategory, rank: usize) -> Option<&Recommendation> {
        self.get(category).get(rank)
    }

    pub fn len(&self) -> usize {
        self.rice.len() + self.crop.len() + self.agroforestry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CarbonEstimate {
    /// tCO₂/ha/yr across the mixed-farming allocation
    pub realistic_carbon: f64,
    pub estimated_credits: f64,
    pub estimated_revenue: f64,
}
