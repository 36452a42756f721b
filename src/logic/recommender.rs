use super::scoring::SuitabilityScorer;
use crate::catalog::VarietyCatalog;
use crate::config::CarbonConfig;
use crate::models::{
    CarbonEstimate, FarmProfile, FarmingScenario, Recommendation, RecommendationSet,
    VarietyCategory,
};

/// Minimum suitability for a variety to be recommended.
pub const SUITABILITY_THRESHOLD: f64 = 0.70;
/// Display derating applied to the suitability score.
pub const CONFIDENCE_FACTOR: f64 = 0.85;
pub const DEFAULT_TOP_N: usize = 5;

/// Mixed-farming carbon blend and credit pricing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarbonModel {
    pub scenario: FarmingScenario,
    /// Fraction of sequestered carbon that becomes saleable credits.
    pub credit_efficiency: f64,
    /// Currency per credit.
    pub credit_price: f64,
}

impl Default for CarbonModel {
    fn default() -> Self {
        Self {
            scenario: FarmingScenario {
                rice_coverage: 0.4,
                primary_crop_coverage: 0.3,
                secondary_crop_coverage: 0.2,
                agroforestry_coverage: 0.1,
            },
            credit_efficiency: 0.85,
            credit_price: 25.0,
        }
    }
}

impl CarbonModel {
    pub fn from_config(config: &CarbonConfig) -> Self {
        Self {
            scenario: FarmingScenario {
                rice_coverage: config.rice_share,
                primary_crop_coverage: config.primary_crop_share,
                secondary_crop_coverage: config.secondary_crop_share,
                agroforestry_coverage: config.agroforestry_share,
            },
            credit_efficiency: config.credit_efficiency,
            credit_price: config.credit_price,
        }
    }

    /// Blend the top rice, top two crops and top agroforestry entries by
    /// their land shares. Missing entries contribute nothing.
    pub fn estimate(&self, set: &RecommendationSet) -> CarbonEstimate {
        let carbon_at = |category: VarietyCategory, rank: usize| {
            set.ranked(category, rank).map_or(0.0, |r| r.carbon_potential)
        };

        let s = &self.scenario;
        let realistic_carbon = s.rice_coverage * carbon_at(VarietyCategory::Rice, 0)
            + s.primary_crop_coverage * carbon_at(VarietyCategory::Crop, 0)
            + s.secondary_crop_coverage * carbon_at(VarietyCategory::Crop, 1)
            + s.agroforestry_coverage * carbon_at(VarietyCategory::Agroforestry, 0);

        let estimated_credits = realistic_carbon * self.credit_efficiency;
        CarbonEstimate {
            realistic_carbon,
            estimated_credits,
            estimated_revenue: estimated_credits * self.credit_price,
        }
    }
}

/// Ranked recommendations for one farm plus the counts behind them.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationOutput {
    pub recommendations: RecommendationSet,
    pub carbon: CarbonEstimate,
    pub total_evaluated: usize,
    /// Varieties at or above the threshold, before the top-N cut.
    pub suitable_found: usize,
    /// Varieties that could not be scored.
    pub skipped: usize,
}

/// Scores a whole catalog against one farm and keeps the best per category.
pub struct RecommendationGenerator {
    scorer: SuitabilityScorer,
    top_n: usize,
    carbon: CarbonModel,
}

impl RecommendationGenerator {
    pub fn new(top_n: usize, carbon: CarbonModel) -> Self {
        Self::with_scorer(SuitabilityScorer::new(), top_n, carbon)
    }

    pub fn with_scorer(scorer: SuitabilityScorer, top_n: usize, carbon: CarbonModel) -> Self {
        Self {
            scorer,
            top_n,
            carbon,
        }
    }

    pub fn scorer(&self) -> &SuitabilityScorer {
        &self.scorer
    }

    pub fn carbon_model(&self) -> &CarbonModel {
        &self.carbon
    }

    pub fn generate(
        &self,
        profile: &FarmProfile,
        zone_id: &str,
        catalog: &VarietyCatalog,
    ) -> RecommendationOutput {
        let mut recommendations = RecommendationSet::default();
        let mut total_evaluated = 0;
        let mut suitable_found = 0;
        let mut skipped = 0;

        for &category in VarietyCategory::all() {
            let mut scored: Vec<Recommendation> = Vec::new();

            for variety in catalog.by_category(category) {
                total_evaluated += 1;
                match self.scorer.score(profile, zone_id, variety) {
                    Ok(score) if score >= SUITABILITY_THRESHOLD => {
                        scored.push(Recommendation::new(variety, score, CONFIDENCE_FACTOR));
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(
                            farm_id = %profile.farm_id,
                            variety_id = %variety.id,
                            "Skipping variety: {}",
                            e
                        );
                        skipped += 1;
                    }
                }
            }

            suitable_found += scored.len();
            // Stable sort keeps catalog order among equal scores
            scored.sort_by(|a, b| b.suitability_score.total_cmp(&a.suitability_score));
            scored.truncate(self.top_n);

            tracing::debug!(
                farm_id = %profile.farm_id,
                category = category.as_str(),
                kept = scored.len(),
                "Category ranked"
            );
            recommendations.set(category, scored);
        }

        let carbon = self.carbon.estimate(&recommendations);

        RecommendationOutput {
            recommendations,
            carbon,
            total_evaluated,
            suitable_found,
            skipped,
        }
    }
}

impl Default for RecommendationGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N, CarbonModel::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::logic::fixtures;
    use crate::models::{MarketValue, Range, Variety};

    fn rec(id: &str, category: VarietyCategory, carbon: f64) -> Recommendation {
        let mut v = fixtures::variety(id, category);
        v.carbon_potential = carbon;
        Recommendation::new(&v, 0.9, CONFIDENCE_FACTOR)
    }

    #[test]
    fn carbon_blend_without_rice_or_agroforestry() {
        let mut set = RecommendationSet::default();
        set.set(
            VarietyCategory::Crop,
            vec![rec("C1", VarietyCategory::Crop, 4.0), rec("C2", VarietyCategory::Crop, 2.5)],
        );

        let estimate = CarbonModel::default().estimate(&set);
        let expected = 0.3 * 4.0 + 0.2 * 2.5;
        assert!((estimate.realistic_carbon - expected).abs() < 1e-12);
        assert!((estimate.estimated_credits - expected * 0.85).abs() < 1e-12);
        assert!((estimate.estimated_revenue - expected * 0.85 * 25.0).abs() < 1e-9);
    }

    #[test]
    fn carbon_blend_full_allocation() {
        let mut set = RecommendationSet::default();
        set.set(VarietyCategory::Rice, vec![rec("R1", VarietyCategory::Rice, 3.0)]);
        set.set(VarietyCategory::Crop, vec![rec("C1", VarietyCategory::Crop, 2.0)]);
        set.set(
            VarietyCategory::Agroforestry,
            vec![rec("A1", VarietyCategory::Agroforestry, 10.0)],
        );

        let estimate = CarbonModel::default().estimate(&set);
        // No second crop: 0.4*3 + 0.3*2 + 0.1*10
        assert!((estimate.realistic_carbon - 2.8).abs() < 1e-12);
    }

    #[test]
    fn empty_set_is_zero_carbon() {
        let estimate = CarbonModel::default().estimate(&RecommendationSet::default());
        assert_eq!(estimate, CarbonEstimate::default());
    }

    #[test]
    fn configured_shares_drive_the_blend() {
        let config = CarbonConfig {
            rice_share: 0.0,
            primary_crop_share: 0.5,
            secondary_crop_share: 0.0,
            agroforestry_share: 0.5,
            credit_efficiency: 1.0,
            credit_price: 10.0,
        };
        let mut set = RecommendationSet::default();
        set.set(VarietyCategory::Crop, vec![rec("C1", VarietyCategory::Crop, 2.0)]);
        set.set(
            VarietyCategory::Agroforestry,
            vec![rec("A1", VarietyCategory::Agroforestry, 6.0)],
        );

        let estimate = CarbonModel::from_config(&config).estimate(&set);
        assert!((estimate.realistic_carbon - 4.0).abs() < 1e-12);
        assert!((estimate.estimated_revenue - 40.0).abs() < 1e-9);
    }

    #[test]
    fn top_n_and_threshold_hold_across_catalog() {
        let catalog = Catalog::builtin().unwrap();
        let generator = RecommendationGenerator::new(3, CarbonModel::default());

        for zone in catalog.zones.zones() {
            let mut profile = fixtures::profile();
            profile.total_rainfall = zone.rainfall_range.midpoint();
            profile.avg_temp = zone.temp_range.midpoint();

            let out = generator.generate(&profile, &zone.id, &catalog.varieties);
            assert_eq!(out.total_evaluated, catalog.varieties.len());
            assert_eq!(out.skipped, 0);
            for &category in VarietyCategory::all() {
                let list = out.recommendations.get(category);
                assert!(list.len() <= 3);
                assert!(list.iter().all(|r| r.suitability_score >= SUITABILITY_THRESHOLD));
                assert!(list
                    .windows(2)
                    .all(|w| w[0].suitability_score >= w[1].suitability_score));
            }
            assert!(out.suitable_found >= out.recommendations.len());
        }
    }

    #[test]
    fn ties_keep_catalog_order() {
        let varieties: Vec<Variety> = (1..=4)
            .map(|i| fixtures::variety(&format!("CROP_{}", i), VarietyCategory::Crop))
            .collect();
        let catalog = VarietyCatalog::from_varieties(varieties).unwrap();
        let generator = RecommendationGenerator::new(2, CarbonModel::default());

        let out = generator.generate(&fixtures::profile(), fixtures::ZONE_ID, &catalog);
        let ids: Vec<&str> = out
            .recommendations
            .crop
            .iter()
            .map(|r| r.variety_id.as_str())
            .collect();
        assert_eq!(ids, vec!["CROP_1", "CROP_2"]);
        assert_eq!(out.suitable_found, 4);
    }

    #[test]
    fn bad_variety_is_skipped_not_fatal() {
        let mut bad = fixtures::variety("CROP_BAD", VarietyCategory::Crop);
        bad.rainfall_range = Range::new(1200.0, 600.0);
        let good = fixtures::variety("CROP_GOOD", VarietyCategory::Crop);
        let catalog = VarietyCatalog::from_varieties(vec![bad, good]).unwrap();

        let out = RecommendationGenerator::default().generate(
            &fixtures::profile(),
            fixtures::ZONE_ID,
            &catalog,
        );
        assert_eq!(out.skipped, 1);
        assert_eq!(out.total_evaluated, 2);
        assert_eq!(out.recommendations.crop.len(), 1);
        assert_eq!(out.recommendations.crop[0].variety_id, "CROP_GOOD");
    }

    #[test]
    fn unsuitable_farm_yields_empty_set() {
        let mut profile = fixtures::profile();
        profile.total_rainfall = 50_000.0;
        profile.avg_temp = 60.0;
        profile.soil_ph = 13.0;
        let catalog =
            VarietyCatalog::from_varieties(vec![fixtures::variety("CROP_1", VarietyCategory::Crop)])
                .unwrap();

        let out = RecommendationGenerator::default().generate(&profile, "elsewhere", &catalog);
        assert!(out.recommendations.is_empty());
        assert_eq!(out.carbon, CarbonEstimate::default());
    }

    #[test]
    fn confidence_is_derated_score() {
        let mut variety = fixtures::variety("AGRO_P", VarietyCategory::Agroforestry);
        variety.market_value = MarketValue::Premium;
        variety.carbon_potential = 6.0;
        let catalog = VarietyCatalog::from_varieties(vec![variety]).unwrap();

        let out = RecommendationGenerator::default().generate(
            &fixtures::profile(),
            fixtures::ZONE_ID,
            &catalog,
        );
        let top = out
            .recommendations
            .ranked(VarietyCategory::Agroforestry, 0)
            .unwrap();
        assert!((top.confidence - top.suitability_score * 0.85).abs() < 1e-12);
        assert!((out.carbon.realistic_carbon - 0.6).abs() < 1e-12);
    }
}
