use super::engine::AnalysisEngine;
use crate::error::{AgroError, Result};
use crate::models::{BatchReport, FarmObservations, FarmOutcome};
use chrono::Utc;
use rayon::prelude::*;
use uuid::Uuid;

/// Analyzes many farms in parallel. A farm that cannot be analyzed becomes a
/// failed outcome; only run-level errors abort the batch.
pub struct BatchAnalyzer<'a> {
    engine: &'a AnalysisEngine,
    workers: Option<usize>,
}

impl<'a> BatchAnalyzer<'a> {
    pub fn new(engine: &'a AnalysisEngine) -> Self {
        Self {
            engine,
            workers: None,
        }
    }

    /// Cap the number of worker threads; `None` uses rayon's global pool.
    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers.filter(|&n| n > 0);
        self
    }

    pub fn run(&self, farms: &[FarmObservations]) -> Result<BatchReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let span = tracing::info_span!("batch", %run_id);
        let _entered = span.enter();

        tracing::info!(farms = farms.len(), workers = ?self.workers, "Batch started");

        // Indexed collect keeps outcomes in input order
        let analyze_all = || -> Vec<Result<FarmOutcome>> {
            farms
                .par_iter()
                .map(|farm| {
                    let farm_span =
                        tracing::info_span!(parent: &span, "farm", farm_id = %farm.farm_id);
                    let _farm = farm_span.enter();
                    self.analyze_one(farm)
                })
                .collect()
        };

        let results = match self.workers {
            Some(n) => rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| {
                    AgroError::Configuration(format!("Failed to start worker pool: {}", e))
                })?
                .install(analyze_all),
            None => analyze_all(),
        };

        let outcomes = results.into_iter().collect::<Result<Vec<_>>>()?;

        let report = BatchReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };

        tracing::info!(
            succeeded = report.success_count(),
            failed = report.failure_count(),
            "Batch finished"
        );

        Ok(report)
    }

    fn analyze_one(&self, farm: &FarmObservations) -> Result<FarmOutcome> {
        match self.engine.analyze(farm) {
            Ok(result) => Ok(FarmOutcome::Succeeded {
                result: Box::new(result),
            }),
            Err(e) if !e.is_fatal_to_run() => {
                tracing::warn!("Farm analysis failed: {}", e);
                Ok(FarmOutcome::Failed {
                    farm_id: farm.farm_id.clone(),
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }
}
