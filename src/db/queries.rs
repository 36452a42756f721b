use crate::db::Database;
use crate::error::{AgroError, Result};
use crate::models::{AnalysisResult, BatchReport, FarmOutcome};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde::Serialize;
use uuid::Uuid;

/// One stored analysis without its full payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub analysis_id: Uuid,
    pub run_id: Uuid,
    pub farm_id: String,
    pub detected_zone: String,
    pub state: String,
    pub district: String,
    pub recommendation_count: usize,
    pub realistic_carbon: f64,
    pub estimated_revenue: f64,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub farm_count: usize,
    pub success_count: usize,
    pub failure_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub farm_id: String,
    pub reason: String,
}

// Batch Queries

impl Database {
    /// Store a batch run, its successful analyses and its failures in one
    /// transaction.
    pub fn record_batch(&self, report: &BatchReport) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let run_id = report.run_id.to_string();

            tx.execute(
                r#"
                INSERT INTO batch_runs
                    (run_id, started_at, finished_at, farm_count, success_count, failure_count)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    run_id,
                    report.started_at.to_rfc3339(),
                    report.finished_at.to_rfc3339(),
                    report.outcomes.len() as i64,
                    report.success_count() as i64,
                    report.failure_count() as i64,
                ],
            )?;

            for outcome in &report.outcomes {
                match outcome {
                    FarmOutcome::Succeeded { result } => {
                        insert_analysis(&tx, &run_id, result)?;
                    }
                    FarmOutcome::Failed { farm_id, reason } => {
                        tx.execute(
                            r#"
                            INSERT INTO farm_failures (run_id, farm_id, reason)
                            VALUES (?1, ?2, ?3)
                            ON CONFLICT(run_id, farm_id) DO UPDATE SET reason = excluded.reason
                            "#,
                            params![run_id, farm_id, reason],
                        )?;
                    }
                }
            }

            tx.commit()?;
            Ok(())
        })
    }

    pub fn recent_batch_runs(&self, limit: usize) -> Result<Vec<BatchRunSummary>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM batch_runs ORDER BY started_at DESC LIMIT ?1",
            )?;
            let rows = stmt.query_map([limit as i64], row_to_batch_run)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()
                .map_err(Into::into)
        })
    }

    pub fn failures_for_run(&self, run_id: Uuid) -> Result<Vec<FailureRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT farm_id, reason FROM farm_failures WHERE run_id = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map([run_id.to_string()], |row| {
                Ok(FailureRecord {
                    farm_id: row.get("farm_id")?,
                    reason: row.get("reason")?,
                })
            })?;
            rows.collect::<std::result::Result<Vec<_>, _>>()
                .map_err(Into::into)
        })
    }
}

// Analysis Queries

impl Database {
    pub fn recent_analyses(&self, limit: usize) -> Result<Vec<AnalysisSummary>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT analysis_id, run_id, farm_id, detected_zone, state, district,
                       recommendation_count, realistic_carbon, estimated_revenue, analyzed_at
                FROM analyses
                ORDER BY analyzed_at DESC
                LIMIT ?1
                "#,
            )?;
            let rows = stmt.query_map([limit as i64], row_to_analysis_summary)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()
                .map_err(Into::into)
        })
    }

    pub fn get_analysis(&self, analysis_id: Uuid) -> Result<Option<AnalysisResult>> {
        let payload: Option<String> = self.with_conn(|conn| {
            conn.query_row(
                "SELECT payload FROM analyses WHERE analysis_id = ?1",
                [analysis_id.to_string()],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
        })?;

        payload
            .map(|json| serde_json::from_str(&json).map_err(AgroError::from))
            .transpose()
    }

    pub fn analyses_for_farm(&self, farm_id: &str) -> Result<Vec<AnalysisSummary>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT analysis_id, run_id, farm_id, detected_zone, state, district,
                       recommendation_count, realistic_carbon, estimated_revenue, analyzed_at
                FROM analyses
                WHERE farm_id = ?1
                ORDER BY analyzed_at DESC
                "#,
            )?;
            let rows = stmt.query_map([farm_id], row_to_analysis_summary)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()
                .map_err(Into::into)
        })
    }
}

fn insert_analysis(
    conn: &rusqlite::Connection,
    run_id: &str,
    result: &AnalysisResult,
) -> Result<()> {
    let payload = serde_json::to_string(result)?;
    conn.execute(
        r#"
        INSERT OR REPLACE INTO analyses
            (analysis_id, run_id, farm_id, detected_zone, state, district,
             recommendation_count, realistic_carbon, estimated_revenue, analyzed_at, payload)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
        params![
            result.analysis_id.to_string(),
            run_id,
            result.farm_id,
            result.detected_zone,
            result.location.state,
            result.location.district,
            result.recommendations.len() as i64,
            result.carbon.realistic_carbon,
            result.carbon.estimated_revenue,
            result.analyzed_at.to_rfc3339(),
            payload,
        ],
    )?;
    Ok(())
}

fn parse_uuid(idx: usize, value: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn row_to_analysis_summary(row: &Row) -> rusqlite::Result<AnalysisSummary> {
    let analysis_id: String = row.get("analysis_id")?;
    let run_id: String = row.get("run_id")?;
    let analyzed_at: String = row.get("analyzed_at")?;
    let count: i64 = row.get("recommendation_count")?;

    Ok(AnalysisSummary {
        analysis_id: parse_uuid(0, &analysis_id)?,
        run_id: parse_uuid(1, &run_id)?,
        farm_id: row.get("farm_id")?,
        detected_zone: row.get("detected_zone")?,
        state: row.get("state")?,
        district: row.get("district")?,
        recommendation_count: count.max(0) as usize,
        realistic_carbon: row.get("realistic_carbon")?,
        estimated_revenue: row.get("estimated_revenue")?,
        analyzed_at: parse_timestamp(9, &analyzed_at)?,
    })
}

fn row_to_batch_run(row: &Row) -> rusqlite::Result<BatchRunSummary> {
    let run_id: String = row.get("run_id")?;
    let started_at: String = row.get("started_at")?;
    let finished_at: String = row.get("finished_at")?;
    let farm_count: i64 = row.get("farm_count")?;
    let success_count: i64 = row.get("success_count")?;
    let failure_count: i64 = row.get("failure_count")?;

    Ok(BatchRunSummary {
        run_id: parse_uuid(0, &run_id)?,
        started_at: parse_timestamp(1, &started_at)?,
        finished_at: parse_timestamp(2, &finished_at)?,
        farm_count: farm_count.max(0) as usize,
        success_count: success_count.max(0) as usize,
        failure_count: failure_count.max(0) as usize,
    })
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::logic::recommender::RecommendationGenerator;
    use crate::logic::{AnalysisEngine, BatchAnalyzer};
    use crate::models::{FarmObservations, WeatherObservation};
    use chrono::{Duration, NaiveDate};

    fn farm(id: &str, days: i64) -> FarmObservations {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        FarmObservations {
            farm_id: id.into(),
            lat: 23.0,
            lon: 85.0,
            weather: (0..days)
                .map(|d| WeatherObservation {
                    date: start + Duration::days(d),
                    precip: 4.0,
                    temp: 25.0,
                    temp_max: 30.0,
                    temp_min: 20.0,
                    humidity: 70.0,
                })
                .collect(),
            vegetation: Vec::new(),
            soil: None,
        }
    }

    fn report() -> BatchReport {
        let engine =
            AnalysisEngine::new(Catalog::builtin().unwrap(), RecommendationGenerator::default());
        BatchAnalyzer::new(&engine)
            .run(&[farm("F1", 365), farm("F2", 0)])
            .unwrap()
    }

    #[test]
    fn batch_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let report = report();
        db.record_batch(&report).unwrap();

        let runs = db.recent_batch_runs(10).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].run_id, report.run_id);
        assert_eq!(runs[0].success_count, 1);
        assert_eq!(runs[0].failure_count, 1);

        let failures = db.failures_for_run(report.run_id).unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].farm_id, "F2");

        let recent = db.recent_analyses(10).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].farm_id, "F1");
        assert_eq!(recent[0].run_id, report.run_id);

        let stored = db.get_analysis(recent[0].analysis_id).unwrap().unwrap();
        let original = report.succeeded().next().unwrap();
        assert_eq!(stored.detected_zone, original.detected_zone);
        assert_eq!(stored.recommendations, original.recommendations);
        assert_eq!(db.analyses_for_farm("F1").unwrap().len(), 1);
    }

    #[test]
    fn stored_payload_keeps_full_float_precision() {
        let db = Database::open_in_memory().unwrap();
        let mut report = report();
        let value = 0.9392857142857144_f64;
        for outcome in &mut report.outcomes {
            if let FarmOutcome::Succeeded { result } = outcome {
                result.carbon.realistic_carbon = value;
            }
        }
        db.record_batch(&report).unwrap();

        let id = report.succeeded().next().unwrap().analysis_id;
        let stored = db.get_analysis(id).unwrap().unwrap();
        assert_eq!(stored.carbon.realistic_carbon.to_bits(), value.to_bits());
    }

    #[test]
    fn missing_analysis_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_analysis(Uuid::new_v4()).unwrap().is_none());
        assert!(db.recent_analyses(5).unwrap().is_empty());
    }
}
