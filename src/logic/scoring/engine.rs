use super::{
    climate::ClimateFactor, economic::EconomicFactor, soil::SoilFactor,
    vegetation::VegetationFactor, zone::ZoneFactor, ScoreFactor, ScoringContext, ScoringWeights,
};
use crate::error::Result;
use crate::models::{DataPoint, FarmProfile, Variety};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorScore {
    pub id: &'static str,
    pub name: &'static str,
    pub contribution: f64,
}

/// Per-factor contributions for one farm/variety pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub variety_id: String,
    pub zone_id: String,
    pub factors: Vec<FactorScore>,
    /// Sum of contributions before clamping.
    pub raw_total: f64,
    /// `raw_total` clamped to [0, 1].
    pub total: f64,
}

impl ScoreBreakdown {
    pub fn data_points(&self) -> Vec<DataPoint> {
        let mut points: Vec<DataPoint> = self
            .factors
            .iter()
            .map(|f| DataPoint::new(f.name, format!("{:+.3}", f.contribution), f.id))
            .collect();
        points.push(DataPoint::new("Raw Total", format!("{:.3}", self.raw_total), "scorer"));
        points.push(DataPoint::new("Suitability", format!("{:.3}", self.total), "scorer"));
        points
    }
}

/// Additive multi-factor compatibility score between a farm and a variety.
pub struct SuitabilityScorer {
    factors: Vec<Box<dyn ScoreFactor>>,
}

impl SuitabilityScorer {
    pub fn new() -> Self {
        Self::with_weights(ScoringWeights::default())
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        let factors: Vec<Box<dyn ScoreFactor>> = vec![
            Box::new(ZoneFactor::new(weights)),
            Box::new(ClimateFactor::new(weights)),
            Box::new(SoilFactor::new(weights)),
            Box::new(VegetationFactor::new(weights)),
            Box::new(EconomicFactor::new(weights)),
        ];

        Self { factors }
    }

    /// Evaluate every factor. Fails with a scoring error when the variety's
    /// tolerance ranges are unusable.
    pub fn breakdown(
        &self,
        profile: &FarmProfile,
        zone_id: &str,
        variety: &Variety,
    ) -> Result<ScoreBreakdown> {
        variety.validate_ranges()?;

        let ctx = ScoringContext { profile, zone_id };
        let factors: Vec<FactorScore> = self
            .factors
            .iter()
            .map(|f| FactorScore {
                id: f.id(),
                name: f.name(),
                contribution: f.evaluate(&ctx, variety),
            })
            .collect();

        let raw_total: f64 = factors.iter().map(|f| f.contribution).sum();

        Ok(ScoreBreakdown {
            variety_id: variety.id.clone(),
            zone_id: zone_id.to_string(),
            factors,
            raw_total,
            total: raw_total.clamp(0.0, 1.0),
        })
    }

    pub fn score(&self, profile: &FarmProfile, zone_id: &str, variety: &Variety) -> Result<f64> {
        Ok(self.breakdown(profile, zone_id, variety)?.total)
    }

    pub fn list_factors(&self) -> Vec<(&'static str, &'static str)> {
        self.factors.iter().map(|f| (f.id(), f.name())).collect()
    }
}

impl Default for SuitabilityScorer {
    fn default() -> Self {
        Self::new()
    }
}
