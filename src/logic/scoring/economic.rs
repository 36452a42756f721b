use super::{ScoreFactor, ScoringContext, ScoringWeights};
use crate::models::{MarketValue, Variety};

/// tCO₂/ha/yr above which a variety earns the carbon bonus.
pub const HIGH_CARBON_THRESHOLD: f64 = 5.0;

pub struct EconomicFactor {
    weights: ScoringWeights,
}

impl EconomicFactor {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }
}

impl ScoreFactor for EconomicFactor {
    fn id(&self) -> &'static str {
        "economic"
    }

    fn name(&self) -> &'static str {
        "Market & Carbon"
    }

    fn evaluate(&self, _ctx: &ScoringContext<'_>, variety: &Variety) -> f64 {
        let mut score = 0.0;
        if variety.market_value == MarketValue::Premium {
            score += self.weights.market;
        }
        if variety.carbon_potential > HIGH_CARBON_THRESHOLD {
            score += self.weights.carbon;
        }
        score
    }
}
