use super::farm_profile::FarmProfile;
use super::recommendation::{CarbonEstimate, RecommendationSet};
use super::zone::ZoneCharacteristics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub state: String,
    pub district: String,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            state: "Unknown".into(),
            district: "Unknown".into(),
        }
    }
}

/// Land-allocation shares assumed by the carbon blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FarmingScenario {
    pub rice_coverage: f64,
    pub primary_crop_coverage: f64,
    pub secondary_crop_coverage: f64,
    pub agroforestry_coverage: f64,
}

/// Everything produced for one farm; consumed by report and scheme matchers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis_id: Uuid,
    pub farm_id: String,
    pub farm_profile: FarmProfile,
    pub detected_zone: String,
    pub zone_name: String,
    pub zone_characteristics: ZoneCharacteristics,
    pub location: Location,
    pub recommendations: RecommendationSet,
    pub total_varieties_evaluated: usize,
    pub suitable_varieties_found: usize,
    pub skipped_varieties: usize,
    pub carbon: CarbonEstimate,
    pub farming_scenario: FarmingScenario,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FarmOutcome {
    Succeeded { result: Box<AnalysisResult> },
    Failed { farm_id: String, reason: String },
}

impl FarmOutcome {
    #[cfg(test)]
    pub fn farm_id(&self) -> &str {
        match self {
            FarmOutcome::Succeeded { result } => &result.farm_id,
            FarmOutcome::Failed { farm_id, .. } => farm_id,
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            FarmOutcome::Succeeded { result } => Some(result),
            FarmOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FarmOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<FarmOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.outcomes.iter().filter_map(FarmOutcome::result)
    }

    pub fn failed(&self) -> impl Iterator<Item = &FarmOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_outcome_serializes_with_status_marker() {
        let outcome = FarmOutcome::Failed {
            farm_id: "FARM_9".into(),
            reason: "no weather rows".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["farm_id"], "FARM_9");
        assert_eq!(outcome.farm_id(), "FARM_9");
        assert!(outcome.result().is_none());
    }

    #[test]
    fn batch_report_counts() {
        let now = Utc::now();
        let report = BatchReport {
            run_id: Uuid::new_v4(),
            started_at: now,
            finished_at: now,
            outcomes: vec![
                FarmOutcome::Failed {
                    farm_id: "A".into(),
                    reason: "x".into(),
                },
                FarmOutcome::Failed {
                    farm_id: "B".into(),
                    reason: "y".into(),
                },
            ],
        };
        assert_eq!(report.failure_count(), 2);
        assert_eq!(report.success_count(), 0);
    }
}
