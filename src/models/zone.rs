use serde::{Deserialize, Serialize};

/// Closed numeric interval, written as `[min, max]` in catalog files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Finite bounds with `min <= max`.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

impl From<[f64; 2]> for Range {
    fn from(bounds: [f64; 2]) -> Self {
        Self::new(bounds[0], bounds[1])
    }
}

impl From<Range> for [f64; 2] {
    fn from(range: Range) -> Self {
        [range.min, range.max]
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(rename = "lat_range")]
    pub lat: Range,
    #[serde(rename = "lon_range")]
    pub lon: Range,
}

impl BoundingBox {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.lat.contains(lat) && self.lon.contains(lon)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.lat.midpoint(), self.lon.midpoint())
    }

    /// Planar euclidean distance in degrees from the point to the box center.
    pub fn distance_to_center(&self, lat: f64, lon: f64) -> f64 {
        let (clat, clon) = self.center();
        ((lat - clat).powi(2) + (lon - clon).powi(2)).sqrt()
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_valid() && self.lon.is_valid()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneCharacteristics {
    pub climate_type: String,
    pub elevation: String,
    #[serde(default)]
    pub major_crops: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub bounds: BoundingBox,
    pub rainfall_range: Range,
    pub temp_range: Range,
    #[serde(default)]
    pub states: Vec<String>,
    /// Alternative names used by variety sources, e.g. `Western_Himalayan`.
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub default_district: Option<String>,
    #[serde(default)]
    pub characteristics: ZoneCharacteristics,
}

impl Zone {
    pub fn matches_reference(&self, reference: &str) -> bool {
        self.id == reference || self.aliases.iter().any(|a| a == reference)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    State,
    District,
}

/// Named administrative area used for location lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub kind: RegionKind,
    #[serde(flatten)]
    pub bounds: BoundingBox,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_box() -> BoundingBox {
        BoundingBox {
            lat: Range::new(12.0, 20.0),
            lon: Range::new(74.0, 80.0),
        }
    }

    #[test]
    fn range_contains_is_inclusive() {
        let r = Range::new(600.0, 1400.0);
        assert!(r.contains(600.0));
        assert!(r.contains(1400.0));
        assert!(!r.contains(599.9));
        assert!(!r.contains(1400.1));
    }

    #[test]
    fn range_validity() {
        assert!(Range::new(5.5, 6.5).is_valid());
        assert!(Range::new(7.0, 7.0).is_valid());
        assert!(!Range::new(8.0, 6.0).is_valid());
        assert!(!Range::new(f64::NAN, 6.0).is_valid());
    }

    #[test]
    fn range_deserializes_from_pair() {
        let r: Range = serde_yaml::from_str("[1000, 2500]").unwrap();
        assert_eq!(r, Range::new(1000.0, 2500.0));
    }

    #[test]
    fn bounding_box_center_and_distance() {
        let b = sample_box();
        assert_eq!(b.center(), (16.0, 77.0));
        assert!(b.distance_to_center(16.0, 77.0).abs() < 1e-12);
        assert!((b.distance_to_center(19.0, 81.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn bounding_box_contains_edges() {
        let b = sample_box();
        assert!(b.contains(12.0, 74.0));
        assert!(b.contains(20.0, 80.0));
        assert!(!b.contains(11.9, 77.0));
        assert!(!b.contains(16.0, 80.1));
    }

    #[test]
    fn zone_matches_id_or_alias() {
        let zone: Zone = serde_yaml::from_str(
            r#"
id: Zone_10_Southern_Plateau
name: Southern Plateau and Hills Region
lat_range: [12, 20]
lon_range: [74, 80]
rainfall_range: [600, 1400]
temp_range: [20, 35]
aliases: [Southern_Plateau_Hills]
"#,
        )
        .unwrap();
        assert!(zone.matches_reference("Zone_10_Southern_Plateau"));
        assert!(zone.matches_reference("Southern_Plateau_Hills"));
        assert!(!zone.matches_reference("Zone_11_East_Coast"));
        assert_eq!(zone.bounds, sample_box());
    }
}
