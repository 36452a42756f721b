use crate::error::{AgroError, Result};
use crate::models::Zone;

/// The zone chosen for a point and how it was chosen.
#[derive(Debug, Clone, Copy)]
pub struct ZoneMatch<'a> {
    pub zone: &'a Zone,
    /// 1 / (1 + distance) for containing zones, 0.0 for the fallback.
    pub score: f64,
    pub contained: bool,
    /// Degrees from the point to the zone's box center.
    pub distance: f64,
}

/// Maps a coordinate to the best-matching agro-climatic zone.
///
/// Among zones whose bounding box contains the point, the one with the
/// closest center wins; equal scores keep the earlier catalog entry. A point
/// outside every box falls back to the nearest center over all zones.
pub struct ZoneDetector<'a> {
    zones: &'a [Zone],
}

impl<'a> ZoneDetector<'a> {
    pub fn new(zones: &'a [Zone]) -> Result<Self> {
        if zones.is_empty() {
            return Err(AgroError::Configuration(
                "zone detection requires a non-empty zone catalog".into(),
            ));
        }
        Ok(Self { zones })
    }

    pub fn detect(&self, lat: f64, lon: f64) -> ZoneMatch<'a> {
        let mut best: Option<ZoneMatch<'a>> = None;

        for zone in self.zones.iter().filter(|z| z.bounds.contains(lat, lon)) {
            let distance = zone.bounds.distance_to_center(lat, lon);
            let score = 1.0 / (1.0 + distance);
            tracing::trace!(zone = %zone.id, score, "Zone candidate");

            if best.map_or(true, |b| score > b.score) {
                best = Some(ZoneMatch {
                    zone,
                    score,
                    contained: true,
                    distance,
                });
            }
        }

        if let Some(found) = best {
            tracing::debug!(zone = %found.zone.id, score = found.score, "Zone detected");
            return found;
        }

        let found = self.nearest(lat, lon);
        tracing::debug!(
            zone = %found.zone.id,
            distance = found.distance,
            "Point outside all zones, using nearest center"
        );
        found
    }

    fn nearest(&self, lat: f64, lon: f64) -> ZoneMatch<'a> {
        // `new` guarantees at least one zone
        let first = &self.zones[0];
        let mut nearest = ZoneMatch {
            zone: first,
            score: 0.0,
            contained: false,
            distance: first.bounds.distance_to_center(lat, lon),
        };

        for zone in &self.zones[1..] {
            let distance = zone.bounds.distance_to_center(lat, lon);
            if distance < nearest.distance {
                nearest = ZoneMatch {
                    zone,
                    score: 0.0,
                    contained: false,
                    distance,
                };
            }
        }
        nearest
    }
}
