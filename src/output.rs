use crate::config::OutputConfig;
use crate::error::Result;
use crate::models::{AnalysisResult, BatchReport, FarmOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One line of the batch summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmSummary {
    pub farm_id: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_varieties: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl FarmSummary {
    fn from_outcome(outcome: &FarmOutcome) -> Self {
        match outcome {
            FarmOutcome::Succeeded { result } => Self {
                farm_id: result.farm_id.clone(),
                status: "succeeded",
                detected_zone: Some(result.detected_zone.clone()),
                top_varieties: Some(top_varieties(result)),
                estimated_revenue: Some(result.carbon.estimated_revenue),
                reason: None,
            },
            FarmOutcome::Failed { farm_id, reason } => Self {
                farm_id: farm_id.clone(),
                status: "failed",
                detected_zone: None,
                top_varieties: None,
                estimated_revenue: None,
                reason: Some(reason.clone()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_farms: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub farms: Vec<FarmSummary>,
}

impl BatchSummary {
    pub fn from_report(report: &BatchReport) -> Self {
        Self {
            run_id: report.run_id,
            started_at: report.started_at,
            finished_at: report.finished_at,
            total_farms: report.outcomes.len(),
            succeeded: report.success_count(),
            failed: report.failure_count(),
            farms: report.outcomes.iter().map(FarmSummary::from_outcome).collect(),
        }
    }
}

/// Top-ranked variety name of each non-empty category.
fn top_varieties(result: &AnalysisResult) -> Vec<String> {
    crate::models::VarietyCategory::all()
        .iter()
        .filter_map(|&c| result.recommendations.ranked(c, 0))
        .map(|r| r.variety_name.clone())
        .collect()
}

/// Writes analysis results as pretty-printed JSON files.
pub struct OutputWriter {
    dir: PathBuf,
    per_farm_files: bool,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>, per_farm_files: bool) -> Self {
        Self {
            dir: dir.into(),
            per_farm_files,
        }
    }

    pub fn from_config(config: &OutputConfig, dir_override: Option<&Path>) -> Self {
        let dir = dir_override.unwrap_or(&config.dir);
        Self::new(dir, config.per_farm_files)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the batch summary and, if enabled, one file per analyzed farm.
    /// Returns every path written, summary last. Farms whose ids map to the
    /// same file name get a numeric suffix so no result is overwritten.
    pub fn write_batch(&self, report: &BatchReport) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.dir)?;
        let mut written = Vec::new();

        if self.per_farm_files {
            let mut taken = HashSet::new();
            for result in report.succeeded() {
                let stem = file_stem(&result.farm_id);
                let mut name = format!("{}_analysis.json", stem);
                let mut n = 1;
                while !taken.insert(name.clone()) {
                    n += 1;
                    name = format!("{}_{}_analysis.json", stem, n);
                }
                written.push(self.write_analysis(result, &name)?);
            }
        }

        let summary = BatchSummary::from_report(report);
        let path = self.dir.join(format!("batch_{}.json", report.run_id));
        std::fs::write(&path, serde_json::to_string_pretty(&summary)?)?;
        tracing::info!(path = %path.display(), "Batch summary written");
        written.push(path);

        Ok(written)
    }

    fn write_analysis(&self, result: &AnalysisResult, file_name: &str) -> Result<PathBuf> {
        let path = self.dir.join(file_name);
        std::fs::write(&path, serde_json::to_string_pretty(result)?)?;
        tracing::debug!(farm_id = %result.farm_id, path = %path.display(), "Analysis written");
        Ok(path)
    }
}

/// Farm ids come from input data; keep only filename-safe characters.
fn file_stem(farm_id: &str) -> String {
    let stem: String = farm_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "farm".into()
    } else {
        stem
    }
}
