use super::{range_match, ScoreFactor, ScoringContext, ScoringWeights};
use crate::models::Variety;

/// Annual rainfall and mean temperature against the variety's tolerances.
pub struct ClimateFactor {
    weights: ScoringWeights,
}

impl ClimateFactor {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }
}

impl ScoreFactor for ClimateFactor {
    fn id(&self) -> &'static str {
        "climate"
    }

    fn name(&self) -> &'static str {
        "Climate Compatibility"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>, variety: &Variety) -> f64 {
        let rainfall = range_match(ctx.profile.total_rainfall, &variety.rainfall_range, 1.0);
        let temperature = range_match(ctx.profile.avg_temp, &variety.temp_range, 1.0);

        rainfall * self.weights.rainfall + temperature * self.weights.temperature
    }
}
