pub mod climate;
pub mod economic;
pub mod engine;
pub mod soil;
pub mod vegetation;
pub mod zone;

pub use engine::{ScoreBreakdown, SuitabilityScorer};

use crate::models::{FarmProfile, Range, Variety};

/// What a factor sees about the farm being scored.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub profile: &'a FarmProfile,
    pub zone_id: &'a str,
}

/// One additive term of the suitability score
pub trait ScoreFactor: Send + Sync {
    /// Unique identifier for this factor
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Signed contribution to the raw (unclamped) total
    fn evaluate(&self, ctx: &ScoringContext<'_>, variety: &Variety) -> f64;
}

/// Weight table for the suitability factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub zone_match: f64,
    pub zone_similarity: f64,
    pub rainfall: f64,
    pub temperature: f64,
    pub ph: f64,
    pub texture: f64,
    pub nutrient: f64,
    pub vegetation: f64,
    pub stress_penalty: f64,
    pub market: f64,
    pub carbon: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            zone_match: 0.50,
            zone_similarity: 0.05,
            rainfall: 0.25,
            temperature: 0.20,
            ph: 0.25,
            texture: 0.15,
            nutrient: 0.10,
            vegetation: 0.05,
            stress_penalty: 0.10,
            market: 0.05,
            carbon: 0.10,
        }
    }
}

/// How well `value` fits `range`, in [0, 1].
///
/// Inside the range is a full match. Outside, the match drops by the
/// fractional distance past the nearer bound, scaled by `penalty`. The
/// distance is taken relative to |bound|; a zero bound uses the larger of the
/// two bound magnitudes instead, and an all-zero range only matches exactly.
pub fn range_match(value: f64, range: &Range, penalty: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    if range.contains(value) {
        return 1.0;
    }

    let (bound, overshoot) = if value < range.min {
        (range.min, range.min - value)
    } else {
        (range.max, value - range.max)
    };

    let denominator = if bound != 0.0 {
        bound.abs()
    } else {
        range.min.abs().max(range.max.abs())
    };
    if denominator == 0.0 {
        return 0.0;
    }

    (1.0 - overshoot / denominator * penalty).clamp(0.0, 1.0)
}
