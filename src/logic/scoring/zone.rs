use super::{ScoreFactor, ScoringContext, ScoringWeights};
use crate::models::Variety;

/// Full weight when the detected zone is one of the variety's zones, a small
/// climate-similarity credit otherwise.
pub struct ZoneFactor {
    weights: ScoringWeights,
}

impl ZoneFactor {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }
}

impl ScoreFactor for ZoneFactor {
    fn id(&self) -> &'static str {
        "zone"
    }

    fn name(&self) -> &'static str {
        "Zone Compatibility"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>, variety: &Variety) -> f64 {
        if variety.suits_zone(ctx.zone_id) {
            self.weights.zone_match
        } else {
            self.weights.zone_similarity
        }
    }
}
