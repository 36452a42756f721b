use super::zones::ZoneCatalog;
use crate::error::{AgroError, Result};
use crate::models::{MarketValue, Range, Variety, VarietyCategory, WaterRequirement};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_VARIETIES: &str = include_str!("../../data/varieties.yaml");

/// pH tolerance assumed for tree species without an explicit range.
const AGROFORESTRY_PH: Range = Range::new(6.0, 8.0);

/// A catalog entry as authored. Optional tolerances are filled in from the
/// variety's primary zone and soil preference when the catalog is built.
#[derive(Debug, Clone, Deserialize)]
pub struct VarietyEntry {
    pub id: String,
    pub name: String,
    pub category: VarietyCategory,
    pub zones: Vec<String>,
    pub carbon_potential: f64,
    #[serde(default)]
    pub market_value: Option<MarketValue>,
    #[serde(default)]
    pub soil_preference: Option<String>,
    #[serde(default)]
    pub water_requirement: Option<String>,
    #[serde(default)]
    pub rainfall_range: Option<Range>,
    #[serde(default)]
    pub temp_range: Option<Range>,
    #[serde(default)]
    pub ph_range: Option<Range>,
    #[serde(default)]
    pub climate_suitability: String,
    #[serde(default)]
    pub characteristics: String,
    #[serde(default)]
    pub special_features: String,
}

#[derive(Debug, Deserialize)]
struct VarietyFile {
    varieties: Vec<VarietyEntry>,
}

/// pH tolerance implied by a soil-preference description.
pub fn ph_range_for(category: VarietyCategory, soil_preference: &str) -> Range {
    if category == VarietyCategory::Agroforestry {
        return AGROFORESTRY_PH;
    }
    let pref = soil_preference.to_lowercase();
    if pref.contains("acidic") {
        Range::new(5.5, 6.5)
    } else if pref.contains("alkaline") || pref.contains("saline") {
        Range::new(7.5, 8.5)
    } else if pref.contains("neutral") {
        Range::new(6.5, 7.5)
    } else {
        Range::new(6.0, 7.5)
    }
}

fn default_soil_preference(category: VarietyCategory) -> &'static str {
    match category {
        VarietyCategory::Rice => "Alluvial",
        VarietyCategory::Crop | VarietyCategory::Agroforestry => "Various",
    }
}

impl VarietyEntry {
    /// Resolve zone references and derive any omitted tolerances.
    ///
    /// Unknown zones and non-positive carbon are configuration errors; the
    /// caller decides what to do with range problems reported by
    /// [`Variety::validate_ranges`].
    pub fn resolve(self, zones: &ZoneCatalog) -> Result<Variety> {
        if self.zones.is_empty() {
            return Err(AgroError::Configuration(format!(
                "variety '{}' lists no compatible zones",
                self.id
            )));
        }
        if !self.carbon_potential.is_finite() || self.carbon_potential <= 0.0 {
            return Err(AgroError::Configuration(format!(
                "variety '{}' has non-positive carbon potential {}",
                self.id, self.carbon_potential
            )));
        }

        let mut zone_ids = Vec::with_capacity(self.zones.len());
        for reference in &self.zones {
            let zone = zones.resolve(reference).ok_or_else(|| {
                AgroError::Configuration(format!(
                    "variety '{}' references unknown zone '{}'",
                    self.id, reference
                ))
            })?;
            if !zone_ids.contains(&zone.id) {
                zone_ids.push(zone.id.clone());
            }
        }

        // Presence checked above.
        let primary = zones
            .get(&zone_ids[0])
            .ok_or_else(|| AgroError::NotFound(zone_ids[0].clone()))?;

        let soil_preference = self
            .soil_preference
            .unwrap_or_else(|| default_soil_preference(self.category).to_string());
        let water_requirement = self
            .water_requirement
            .as_deref()
            .map(WaterRequirement::from_description)
            .unwrap_or_default();
        let market_value = self
            .market_value
            .unwrap_or_else(|| MarketValue::infer(self.category, &self.characteristics));

        Ok(Variety {
            rainfall_range: self.rainfall_range.unwrap_or(primary.rainfall_range),
            temp_range: self.temp_range.unwrap_or(primary.temp_range),
            ph_range: self
                .ph_range
                .unwrap_or_else(|| ph_range_for(self.category, &soil_preference)),
            id: self.id,
            name: self.name,
            category: self.category,
            zones: zone_ids,
            carbon_potential: self.carbon_potential,
            market_value,
            soil_preference,
            water_requirement,
            climate_suitability: self.climate_suitability,
            characteristics: self.characteristics,
            special_features: self.special_features,
        })
    }
}

/// Read-only table of candidate varieties in catalog order.
#[derive(Debug, Clone)]
pub struct VarietyCatalog {
    varieties: Vec<Variety>,
    rejected: Vec<String>,
}

impl VarietyCatalog {
    /// Build from authored entries. Entries with unusable tolerance ranges
    /// are dropped with a warning; everything else malformed is fatal.
    pub fn from_entries(entries: Vec<VarietyEntry>, zones: &ZoneCatalog) -> Result<Self> {
        if entries.is_empty() {
            return Err(AgroError::Configuration(
                "variety catalog contains no varieties".into(),
            ));
        }

        let mut seen = HashSet::new();
        let mut varieties = Vec::with_capacity(entries.len());
        let mut rejected = Vec::new();

        for entry in entries {
            if !seen.insert(entry.id.clone()) {
                return Err(AgroError::Configuration(format!(
                    "duplicate variety id '{}'",
                    entry.id
                )));
            }
            let variety = entry.resolve(zones)?;
            match variety.validate_ranges() {
                Ok(()) => varieties.push(variety),
                Err(e) => {
                    tracing::warn!(variety_id = %variety.id, "Rejecting catalog entry: {}", e);
                    rejected.push(variety.id);
                }
            }
        }

        if varieties.is_empty() {
            return Err(AgroError::Configuration(
                "every variety in the catalog was rejected".into(),
            ));
        }

        tracing::info!(
            rice = varieties.iter().filter(|v| v.category == VarietyCategory::Rice).count(),
            crop = varieties.iter().filter(|v| v.category == VarietyCategory::Crop).count(),
            agroforestry = varieties
                .iter()
                .filter(|v| v.category == VarietyCategory::Agroforestry)
                .count(),
            rejected = rejected.len(),
            "Variety catalog loaded"
        );

        Ok(Self {
            varieties,
            rejected,
        })
    }

    /// Wrap already-resolved varieties. Ranges are not checked here; the
    /// scorer reports bad ranges per variety.
    #[cfg(test)]
    pub fn from_varieties(varieties: Vec<Variety>) -> Result<Self> {
        if varieties.is_empty() {
            return Err(AgroError::Configuration(
                "variety catalog contains no varieties".into(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = varieties.iter().find(|v| !seen.insert(v.id.as_str())) {
            return Err(AgroError::Configuration(format!(
                "duplicate variety id '{}'",
                dup.id
            )));
        }
        Ok(Self {
            varieties,
            rejected: Vec::new(),
        })
    }

    pub fn from_yaml(content: &str, zones: &ZoneCatalog) -> Result<Self> {
        let file: VarietyFile = serde_yaml::from_str(content).map_err(|e| {
            AgroError::Configuration(format!("Failed to parse variety catalog: {}", e))
        })?;
        Self::from_entries(file.varieties, zones)
    }

    pub fn builtin(zones: &ZoneCatalog) -> Result<Self> {
        Self::from_yaml(BUILTIN_VARIETIES, zones)
    }

    pub fn load(path: Option<&Path>, zones: &ZoneCatalog) -> Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p).map_err(|e| {
                    AgroError::Configuration(format!(
                        "Failed to read variety catalog {:?}: {}",
                        p, e
                    ))
                })?;
                Self::from_yaml(&content, zones)
            }
            None => Self::builtin(zones),
        }
    }

    pub fn all(&self) -> &[Variety] {
        &self.varieties
    }

    pub fn by_category(&self, category: VarietyCategory) -> impl Iterator<Item = &Variety> {
        self.varieties.iter().filter(move |v| v.category == category)
    }

    pub fn get(&self, id: &str) -> Option<&Variety> {
        self.varieties.iter().find(|v| v.id == id)
    }

    /// Ids of entries dropped at load time.
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.varieties.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zones() -> ZoneCatalog {
        ZoneCatalog::builtin().unwrap()
    }

    #[test]
    fn builtin_catalog_covers_all_categories() {
        let catalog = VarietyCatalog::builtin(&zones()).unwrap();
        for category in VarietyCategory::all() {
            assert!(
                catalog.by_category(*category).count() > 0,
                "no varieties for {}",
                category
            );
        }
        assert!(catalog.rejected().is_empty());
    }

    #[test]
    fn builtin_zone_references_are_canonical_ids() {
        let zones = zones();
        let catalog = VarietyCatalog::builtin(&zones).unwrap();
        for variety in catalog.all() {
            for zone_id in &variety.zones {
                assert!(zones.get(zone_id).is_some(), "{} -> {}", variety.id, zone_id);
            }
        }
    }

    #[test]
    fn omitted_ranges_come_from_primary_zone() {
        let catalog = VarietyCatalog::builtin(&zones()).unwrap();
        // Pusa Basmati lists the Trans-Gangetic alias first.
        let basmati = catalog.get("RICE_001").unwrap();
        assert_eq!(basmati.zones[0], "Zone_6_Trans_Gangetic");
        assert_eq!(basmati.rainfall_range, Range::new(300.0, 800.0));
        assert_eq!(basmati.temp_range, Range::new(2.0, 45.0));
        assert_eq!(basmati.market_value, MarketValue::Premium);
        assert_eq!(basmati.water_requirement, WaterRequirement::High);
    }

    #[test]
    fn explicit_ranges_are_kept() {
        let catalog = VarietyCatalog::builtin(&zones()).unwrap();
        let khejri = catalog.get("AGRO_007").unwrap();
        assert_eq!(khejri.ph_range, Range::new(7.0, 9.0));
        assert_eq!(khejri.rainfall_range, Range::new(100.0, 600.0));
    }

    #[test]
    fn ph_range_from_soil_preference() {
        assert_eq!(
            ph_range_for(VarietyCategory::Rice, "Laterite, acidic"),
            Range::new(5.5, 6.5)
        );
        assert_eq!(
            ph_range_for(VarietyCategory::Crop, "Clay, saline"),
            Range::new(7.5, 8.5)
        );
        assert_eq!(
            ph_range_for(VarietyCategory::Crop, "Clay, neutral"),
            Range::new(6.5, 7.5)
        );
        assert_eq!(ph_range_for(VarietyCategory::Rice, "Loam"), Range::new(6.0, 7.5));
        assert_eq!(
            ph_range_for(VarietyCategory::Agroforestry, "Laterite, acidic"),
            Range::new(6.0, 8.0)
        );
    }

    #[test]
    fn inverted_range_entry_is_rejected_not_fatal() {
        let yaml = r#"
varieties:
  - id: GOOD
    name: Good Rice
    category: rice
    zones: [Zone_10_Southern_Plateau]
    carbon_potential: 3.0
  - id: BAD
    name: Bad Rice
    category: rice
    zones: [Zone_10_Southern_Plateau]
    carbon_potential: 3.0
    rainfall_range: [1500, 600]
"#;
        let catalog = VarietyCatalog::from_yaml(yaml, &zones()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("GOOD").is_some());
        assert_eq!(catalog.rejected(), &["BAD".to_string()]);
    }

    #[test]
    fn unknown_zone_reference_is_fatal() {
        let yaml = r#"
varieties:
  - { id: X, name: X, category: crop, zones: [Zone_99_Moon], carbon_potential: 1.0 }
"#;
        let err = VarietyCatalog::from_yaml(yaml, &zones()).unwrap_err();
        assert!(matches!(err, AgroError::Configuration(_)));
        assert!(err.to_string().contains("Zone_99_Moon"));
    }

    #[test]
    fn non_positive_carbon_is_fatal() {
        let yaml = r#"
varieties:
  - { id: X, name: X, category: crop, zones: [Zone_13_Gujarat], carbon_potential: 0.0 }
"#;
        assert!(VarietyCatalog::from_yaml(yaml, &zones()).is_err());
    }

    #[test]
    fn empty_and_duplicate_catalogs_are_fatal() {
        assert!(VarietyCatalog::from_entries(Vec::new(), &zones()).is_err());

        let yaml = r#"
varieties:
  - { id: X, name: X, category: crop, zones: [Zone_13_Gujarat], carbon_potential: 1.0 }
  - { id: X, name: Y, category: crop, zones: [Zone_13_Gujarat], carbon_potential: 1.0 }
"#;
        let err = VarietyCatalog::from_yaml(yaml, &zones()).unwrap_err();
        assert!(err.to_string().contains("duplicate variety id"));
    }

    #[test]
    fn default_soil_preference_by_category() {
        let yaml = r#"
varieties:
  - { id: R, name: R, category: rice, zones: [Zone_13_Gujarat], carbon_potential: 1.0 }
"#;
        let catalog = VarietyCatalog::from_yaml(yaml, &zones()).unwrap();
        let rice = catalog.get("R").unwrap();
        assert_eq!(rice.soil_preference, "Alluvial");
        assert_eq!(rice.water_requirement, WaterRequirement::Medium);
        assert_eq!(rice.market_value, MarketValue::High);
    }
}
