use crate::catalog::ZoneCatalog;
use crate::models::{Location, Region, RegionKind, Zone};

const UNKNOWN: &str = "Unknown";

/// Names the state and district for a point from the catalog's regions,
/// falling back to the detected zone's metadata.
pub struct LocationResolver<'a> {
    regions: &'a [Region],
}

impl<'a> LocationResolver<'a> {
    pub fn new(catalog: &'a ZoneCatalog) -> Self {
        Self {
            regions: catalog.regions(),
        }
    }

    #[cfg(test)]
    pub fn from_regions(regions: &'a [Region]) -> Self {
        Self { regions }
    }

    pub fn resolve(&self, lat: f64, lon: f64, zone: &Zone) -> Location {
        let state = self
            .region_name(RegionKind::State, lat, lon)
            .or_else(|| zone.states.first().map(String::as_str))
            .unwrap_or(UNKNOWN);

        let district = self
            .region_name(RegionKind::District, lat, lon)
            .or(zone.default_district.as_deref())
            .unwrap_or(UNKNOWN);

        Location {
            state: state.to_string(),
            district: district.to_string(),
        }
    }

    fn region_name(&self, kind: RegionKind, lat: f64, lon: f64) -> Option<&'a str> {
        self.regions
            .iter()
            .find(|r| r.kind == kind && r.bounds.contains(lat, lon))
            .map(|r| r.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ZoneCatalog {
        ZoneCatalog::builtin().unwrap()
    }

    #[test]
    fn state_and_district_from_regions() {
        let catalog = catalog();
        let zone = catalog.get("Zone_10_Southern_Plateau").unwrap();
        let location = LocationResolver::new(&catalog).resolve(14.7, 77.6, zone);
        assert_eq!(location.state, "Karnataka");
        assert_eq!(location.district, "Anantapur");
    }

    #[test]
    fn first_matching_state_wins() {
        // Inside both the Tamil Nadu and Karnataka boxes
        let catalog = catalog();
        let zone = catalog.get("Zone_10_Southern_Plateau").unwrap();
        let location = LocationResolver::new(&catalog).resolve(12.95, 77.6, zone);
        assert_eq!(location.state, "Tamil Nadu");
        assert_eq!(location.district, "Bangalore Urban");
    }

    #[test]
    fn falls_back_to_zone_metadata() {
        let catalog = catalog();
        let zone = catalog.get("Zone_11_East_Coast").unwrap();
        let location = LocationResolver::new(&catalog).resolve(20.0, 85.0, zone);
        assert_eq!(location.state, "Odisha");
        assert_eq!(location.district, "Krishna");
    }

    #[test]
    fn unknown_without_any_metadata() {
        let catalog = catalog();
        let zone = catalog.get("Zone_14_Western_Dry").unwrap();
        let location = LocationResolver::from_regions(&[]).resolve(27.0, 72.0, zone);
        assert_eq!(location.district, "Unknown");

        let mut bare = zone.clone();
        bare.states.clear();
        let location = LocationResolver::from_regions(&[]).resolve(27.0, 72.0, &bare);
        assert_eq!(location, Location::default());
    }
}
