use super::{ScoreFactor, ScoringContext, ScoringWeights};
use crate::models::Variety;

/// Days above 35 °C beyond which the farm counts as heat stressed.
pub const HEAT_STRESS_LIMIT_DAYS: u32 = 60;
/// Dry days beyond which the farm counts as drought stressed.
pub const DROUGHT_STRESS_LIMIT_DAYS: u32 = 180;

/// Healthy canopy bonus and heat/drought stress penalty. Independent of the
/// variety being scored.
pub struct VegetationFactor {
    weights: ScoringWeights,
}

impl VegetationFactor {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }
}

impl ScoreFactor for VegetationFactor {
    fn id(&self) -> &'static str {
        "vegetation"
    }

    fn name(&self) -> &'static str {
        "Vegetation & Stress"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>, _variety: &Variety) -> f64 {
        let profile = ctx.profile;
        let mut score = 0.0;

        if profile.vegetation_health.is_healthy() {
            score += self.weights.vegetation;
        }

        if profile.heat_stress_days > HEAT_STRESS_LIMIT_DAYS
            || profile.drought_stress_days > DROUGHT_STRESS_LIMIT_DAYS
        {
            score -= self.weights.stress_penalty;
        }

        score
    }
}
