pub mod varieties;
pub mod zones;

pub use varieties::VarietyCatalog;
pub use zones::ZoneCatalog;

use crate::config::CatalogConfig;
use crate::error::Result;

/// Zone and variety reference data, loaded once per run and shared read-only.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub zones: ZoneCatalog,
    pub varieties: VarietyCatalog,
}

impl Catalog {
    pub fn new(zones: ZoneCatalog, varieties: VarietyCatalog) -> Self {
        Self { zones, varieties }
    }

    #[cfg(test)]
    pub fn builtin() -> Result<Self> {
        let zones = ZoneCatalog::builtin()?;
        let varieties = VarietyCatalog::builtin(&zones)?;
        Ok(Self::new(zones, varieties))
    }

    pub fn load(config: &CatalogConfig) -> Result<Self> {
        let zones = ZoneCatalog::load(config.zones_path.as_deref())?;
        let varieties = VarietyCatalog::load(config.varieties_path.as_deref(), &zones)?;
        tracing::info!(
            zones = zones.len(),
            varieties = varieties.len(),
            "Catalog loaded"
        );
        Ok(Self::new(zones, varieties))
    }
}
