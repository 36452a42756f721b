use super::location::LocationResolver;
use super::profile_builder::FarmProfileBuilder;
use super::recommender::{CarbonModel, RecommendationGenerator};
use super::scoring::ScoreBreakdown;
use super::zone_detector::{ZoneDetector, ZoneMatch};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{AgroError, Result};
use crate::models::{AnalysisResult, FarmObservations, Location};
use chrono::Utc;
use uuid::Uuid;

/// Runs the per-farm pipeline: profile, zone, location, recommendations.
pub struct AnalysisEngine {
    catalog: Catalog,
    builder: FarmProfileBuilder,
    generator: RecommendationGenerator,
}

impl AnalysisEngine {
    pub fn new(catalog: Catalog, generator: RecommendationGenerator) -> Self {
        Self {
            catalog,
            builder: FarmProfileBuilder::new(),
            generator,
        }
    }

    pub fn from_config(config: &Config, catalog: Catalog) -> Self {
        let generator = RecommendationGenerator::new(
            config.engine.top_n,
            CarbonModel::from_config(&config.carbon),
        );
        Self::new(catalog, generator)
    }

    #[cfg(test)]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Detect the zone for a point and name its location.
    pub fn locate(&self, lat: f64, lon: f64) -> Result<(ZoneMatch<'_>, Location)> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(AgroError::InvalidData(format!(
                "coordinates must be finite, got ({}, {})",
                lat, lon
            )));
        }
        let found = ZoneDetector::new(self.catalog.zones.zones())?.detect(lat, lon);
        let location = LocationResolver::new(&self.catalog.zones).resolve(lat, lon, found.zone);
        Ok((found, location))
    }

    pub fn analyze(&self, farm: &FarmObservations) -> Result<AnalysisResult> {
        let profile = self.builder.build(farm)?;
        let (found, location) = self.locate(profile.lat, profile.lon)?;
        let zone = found.zone;

        tracing::info!(
            zone = %zone.id,
            contained = found.contained,
            state = %location.state,
            district = %location.district,
            "Zone detected"
        );

        let output = self
            .generator
            .generate(&profile, &zone.id, &self.catalog.varieties);

        tracing::info!(
            suitable = output.suitable_found,
            recommended = output.recommendations.len(),
            skipped = output.skipped,
            realistic_carbon = output.carbon.realistic_carbon,
            "Analysis complete"
        );

        Ok(AnalysisResult {
            analysis_id: Uuid::new_v4(),
            farm_id: profile.farm_id.clone(),
            detected_zone: zone.id.clone(),
            zone_name: zone.name.clone(),
            zone_characteristics: zone.characteristics.clone(),
            location,
            recommendations: output.recommendations,
            total_varieties_evaluated: output.total_evaluated,
            suitable_varieties_found: output.suitable_found,
            skipped_varieties: output.skipped,
            carbon: output.carbon,
            farming_scenario: self.generator.carbon_model().scenario,
            analyzed_at: Utc::now(),
            farm_profile: profile,
        })
    }

    /// Factor-by-factor score of one variety for one farm.
    pub fn explain(&self, farm: &FarmObservations, variety_id: &str) -> Result<ScoreBreakdown> {
        let variety = self
            .catalog
            .varieties
            .get(variety_id)
            .ok_or_else(|| AgroError::NotFound(format!("variety '{}'", variety_id)))?;
        let profile = self.builder.build(farm)?;
        let (found, _) = self.locate(profile.lat, profile.lon)?;
        self.generator
            .scorer()
            .breakdown(&profile, &found.zone.id, variety)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{VarietyCatalog, ZoneCatalog};
    use crate::models::{
        MarketValue, Range, SoilSurvey, VarietyCategory, WeatherObservation,
    };
    use chrono::{Duration, NaiveDate};

    const WEST_COAST: &str = "Zone_12_West_Coast";

    /// A year of weather with the given annual rainfall and constant temperature.
    fn observations(farm_id: &str, lat: f64, lon: f64, annual_mm: f64, temp: f64) -> FarmObservations {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let weather = (0..365)
            .map(|d| WeatherObservation {
                date: start + Duration::days(d),
                precip: annual_mm / 365.0,
                temp,
                temp_max: temp + 4.0,
                temp_min: temp - 4.0,
                humidity: 80.0,
            })
            .collect();
        FarmObservations {
            farm_id: farm_id.into(),
            lat,
            lon,
            weather,
            vegetation: Vec::new(),
            soil: Some(SoilSurvey {
                ph_raw: Some(60.0),
                clay: Some(250.0),
                sand: Some(450.0),
                silt: Some(300.0),
                soc: Some(2.1),
                cec: Some(180.0),
                ..Default::default()
            }),
        }
    }

    fn single_variety_engine() -> AnalysisEngine {
        let zones = ZoneCatalog::builtin().unwrap();
        let variety = crate::models::Variety {
            id: "AGRO_T".into(),
            name: "Test Teak".into(),
            category: VarietyCategory::Agroforestry,
            zones: vec![WEST_COAST.into()],
            rainfall_range: Range::new(2000.0, 4000.0),
            temp_range: Range::new(22.0, 32.0),
            ph_range: Range::new(5.5, 6.5),
            carbon_potential: 6.0,
            market_value: MarketValue::Premium,
            soil_preference: "Laterite".into(),
            water_requirement: Default::default(),
            climate_suitability: String::new(),
            characteristics: String::new(),
            special_features: String::new(),
        };
        let varieties = VarietyCatalog::from_varieties(vec![variety]).unwrap();
        AnalysisEngine::new(Catalog::new(zones, varieties), RecommendationGenerator::default())
    }

    #[test]
    fn zone_center_farm_gets_its_only_variety() {
        let engine = single_variety_engine();
        let (lat, lon) = engine
            .catalog()
            .zones
            .get(WEST_COAST)
            .unwrap()
            .bounds
            .center();
        let farm = observations("FARM_WC", lat, lon, 3000.0, 27.0);

        let result = engine.analyze(&farm).unwrap();
        assert_eq!(result.detected_zone, WEST_COAST);
        assert_eq!(result.farm_profile.soil_ph, 6.0);

        let top = result
            .recommendations
            .ranked(VarietyCategory::Agroforestry, 0)
            .unwrap();
        assert_eq!(top.variety_id, "AGRO_T");
        assert!(top.suitability_score >= 0.70);
        assert_eq!(result.recommendations.len(), 1);
        assert!(result.carbon.realistic_carbon > 0.0);
        assert!((result.carbon.realistic_carbon - 0.6).abs() < 1e-12);
        assert_eq!(result.total_varieties_evaluated, 1);
    }

    #[test]
    fn farm_without_weather_fails_with_profile_error() {
        let engine = single_variety_engine();
        let mut farm = observations("FARM_EMPTY", 12.5, 74.5, 3000.0, 27.0);
        farm.weather.clear();
        let err = engine.analyze(&farm).unwrap_err();
        assert!(matches!(err, AgroError::ProfileBuild { .. }));
        assert!(!err.is_fatal_to_run());
    }

    #[test]
    fn builtin_catalog_end_to_end() {
        let engine = AnalysisEngine::new(Catalog::builtin().unwrap(), RecommendationGenerator::default());
        let farm = observations("FARM_KA", 13.0, 77.6, 900.0, 25.0);

        let result = engine.analyze(&farm).unwrap();
        assert_eq!(result.location.state, "Tamil Nadu");
        assert_eq!(result.total_varieties_evaluated, engine.catalog().varieties.len());
        assert!(result.suitable_varieties_found >= result.recommendations.len());
        for category in VarietyCategory::all() {
            assert!(result.recommendations.get(*category).len() <= 5);
        }
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"detected_zone\""));
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let engine = single_variety_engine();
        for (lat, lon) in [(f64::NAN, 75.0), (12.5, f64::INFINITY), (f64::NAN, f64::NAN)] {
            assert!(matches!(
                engine.locate(lat, lon),
                Err(AgroError::InvalidData(_))
            ));
        }
        assert!(engine.locate(12.5, 74.5).is_ok());
    }

    #[test]
    fn explain_unknown_variety_is_not_found() {
        let engine = single_variety_engine();
        let farm = observations("FARM_WC", 12.5, 74.5, 3000.0, 27.0);
        assert!(matches!(
            engine.explain(&farm, "NOPE"),
            Err(AgroError::NotFound(_))
        ));
        let breakdown = engine.explain(&farm, "AGRO_T").unwrap();
        assert_eq!(breakdown.zone_id, WEST_COAST);
        assert!(breakdown.total >= 0.70);
    }
}
