use crate::error::{AgroError, Result};
use crate::models::{Region, Zone};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_ZONES: &str = include_str!("../../data/zones.yaml");

#[derive(Debug, Deserialize)]
struct ZoneFile {
    zones: Vec<Zone>,
    #[serde(default)]
    regions: Vec<Region>,
}

/// Immutable table of agro-climatic zones plus optional named regions.
#[derive(Debug, Clone)]
pub struct ZoneCatalog {
    zones: Vec<Zone>,
    regions: Vec<Region>,
}

impl ZoneCatalog {
    pub fn new(zones: Vec<Zone>, regions: Vec<Region>) -> Result<Self> {
        if zones.is_empty() {
            return Err(AgroError::Configuration(
                "zone catalog contains no zones".into(),
            ));
        }

        let mut seen = HashSet::new();
        for zone in &zones {
            if !seen.insert(zone.id.as_str()) {
                return Err(AgroError::Configuration(format!(
                    "duplicate zone id '{}'",
                    zone.id
                )));
            }
            if !zone.bounds.is_valid() {
                return Err(AgroError::Configuration(format!(
                    "zone '{}' has an invalid bounding box",
                    zone.id
                )));
            }
            if !zone.rainfall_range.is_valid() || !zone.temp_range.is_valid() {
                return Err(AgroError::Configuration(format!(
                    "zone '{}' has an invalid rainfall or temperature range",
                    zone.id
                )));
            }
        }

        if let Some(region) = regions.iter().find(|r| !r.bounds.is_valid()) {
            return Err(AgroError::Configuration(format!(
                "region '{}' has an invalid bounding box",
                region.name
            )));
        }

        Ok(Self { zones, regions })
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let file: ZoneFile = serde_yaml::from_str(content)
            .map_err(|e| AgroError::Configuration(format!("Failed to parse zone catalog: {}", e)))?;
        Self::new(file.zones, file.regions)
    }

    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_ZONES)
    }

    /// Load from `path`, or the embedded catalog when no path is configured.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p).map_err(|e| {
                    AgroError::Configuration(format!("Failed to read zone catalog {:?}: {}", p, e))
                })?;
                Self::from_yaml(&content)
            }
            None => Self::builtin(),
        }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn get(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Look up a zone by id or alias.
    pub fn resolve(&self, reference: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.matches_reference(reference))
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }
}
