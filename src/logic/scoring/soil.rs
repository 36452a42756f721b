use super::{range_match, ScoreFactor, ScoringContext, ScoringWeights};
use crate::models::{MarketValue, Variety};

/// pH mismatch costs twice as much as a climate mismatch.
const PH_PENALTY: f64 = 2.0;

/// Soil pH fit plus texture and nutrient bonuses.
///
/// The texture bonus is a case-sensitive substring test of the variety's
/// soil preference against the farm's texture label, so "Loam" matches
/// "Clay Loam" but "Red" never matches a texture class.
pub struct SoilFactor {
    weights: ScoringWeights,
}

impl SoilFactor {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }
}

impl ScoreFactor for SoilFactor {
    fn id(&self) -> &'static str {
        "soil"
    }

    fn name(&self) -> &'static str {
        "Soil Compatibility"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>, variety: &Variety) -> f64 {
        let profile = ctx.profile;
        let mut score =
            range_match(profile.soil_ph, &variety.ph_range, PH_PENALTY) * self.weights.ph;

        if profile.texture.contains(variety.soil_preference.as_str()) {
            score += self.weights.texture;
        }

        if profile.nutrient_status.is_rich() && variety.market_value == MarketValue::Premium {
            score += self.weights.nutrient;
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::fixtures;
    use crate::models::{NutrientStatus, VarietyCategory};

    fn evaluate(profile: &crate::models::FarmProfile, variety: &Variety) -> f64 {
        let ctx = ScoringContext {
            profile,
            zone_id: fixtures::ZONE_ID,
        };
        SoilFactor::new(ScoringWeights::default()).evaluate(&ctx, variety)
    }

    #[test]
    fn texture_keyword_is_case_sensitive_substring() {
        let profile = fixtures::profile();
        let mut variety = fixtures::variety("CROP_T", VarietyCategory::Crop);

        variety.soil_preference = "Loam".into();
        assert!((evaluate(&profile, &variety) - 0.40).abs() < 1e-12);

        variety.soil_preference = "loam".into();
        assert!((evaluate(&profile, &variety) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn nutrient_bonus_needs_rich_soil_and_premium_tier() {
        let mut profile = fixtures::profile();
        profile.nutrient_status = NutrientStatus::Good;
        let mut variety = fixtures::variety("RICE_T", VarietyCategory::Rice);

        assert!((evaluate(&profile, &variety) - 0.25).abs() < 1e-12);

        variety.market_value = MarketValue::Premium;
        assert!((evaluate(&profile, &variety) - 0.35).abs() < 1e-12);

        profile.nutrient_status = NutrientStatus::Moderate;
        assert!((evaluate(&profile, &variety) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn unconverted_ph_loses_the_whole_term() {
        let mut profile = fixtures::profile();
        profile.soil_ph = 69.0;
        let variety = fixtures::variety("AGRO_T", VarietyCategory::Agroforestry);
        assert_eq!(evaluate(&profile, &variety), 0.0);
    }
}
