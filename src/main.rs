mod catalog;
mod cli;
mod config;
mod db;
mod error;
mod logic;
mod models;
mod output;

use anyhow::{bail, Context, Result};
use catalog::Catalog;
use clap::Parser;
use cli::{Cli, Commands};
use db::Database;
use logic::{AnalysisEngine, BatchAnalyzer, SuitabilityScorer};
use models::{AnalysisResult, BatchReport, FarmObservations, FarmOutcome, VarietyCategory};
use output::OutputWriter;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::config::Config;

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init => {
            Config::setup_interactive()?;
            Ok(())
        }
        Commands::Check => check(cli.config.as_deref(), cli.data_dir.as_deref()),
        Commands::Analyze {
            ref input,
            ref output,
            top_n,
            no_store,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(n) = top_n {
                config.engine.top_n = n;
                config.validate()?;
            }
            analyze(
                &config,
                input,
                output.as_deref(),
                !no_store,
                cli.data_dir.as_deref(),
            )
        }
        Commands::Zone { lat, lon } => {
            let config = load_config(cli.config.as_deref())?;
            zone(&config, lat, lon)
        }
        Commands::Explain {
            ref input,
            ref farm,
            ref variety,
        } => {
            let config = load_config(cli.config.as_deref())?;
            explain(&config, input, farm, variety)
        }
        Commands::Catalog { ref category } => {
            let config = load_config(cli.config.as_deref())?;
            list_catalog(&config, category.as_deref())
        }
        Commands::History {
            limit,
            ref farm,
            show,
        } => {
            let config = load_config(cli.config.as_deref())?;
            match show {
                Some(analysis_id) => show_analysis(&config, cli.data_dir.as_deref(), analysis_id),
                None => history(&config, cli.data_dir.as_deref(), limit, farm.as_deref()),
            }
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    Config::load(path).context("Configuration error")
}

fn build_engine(config: &Config) -> Result<AnalysisEngine> {
    let catalog = Catalog::load(&config.catalog).context("Failed to load catalogs")?;
    Ok(AnalysisEngine::from_config(config, catalog))
}

/// Input files hold either one farm record or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum FarmInput {
    Many(Vec<FarmObservations>),
    One(Box<FarmObservations>),
}

fn load_farms(path: &Path) -> Result<Vec<FarmObservations>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let input: FarmInput = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse farm observations in {}", path.display()))?;
    Ok(match input {
        FarmInput::Many(farms) => farms,
        FarmInput::One(farm) => vec![*farm],
    })
}

fn analyze(
    config: &Config,
    input: &Path,
    output_dir: Option<&Path>,
    store: bool,
    data_dir: Option<&Path>,
) -> Result<()> {
    let engine = build_engine(config)?;
    let farms = load_farms(input)?;
    if farms.is_empty() {
        bail!("No farms found in {}", input.display());
    }

    let report = BatchAnalyzer::new(&engine)
        .with_workers(config.engine.workers)
        .run(&farms)?;

    let writer = OutputWriter::from_config(&config.output, output_dir);
    let written = writer
        .write_batch(&report)
        .with_context(|| format!("Failed to write results to {}", writer.dir().display()))?;

    if store {
        let db = Database::open(&config.db_path(data_dir)?)?;
        db.record_batch(&report)?;
        tracing::info!(path = %db.path().display(), "Results stored");
    }

    print_report(&report);
    if let Some(summary) = written.last() {
        println!();
        println!("Summary written to {}", summary.display());
    }
    Ok(())
}

fn print_report(report: &BatchReport) {
    println!(
        "Run {}: {} farms, {} succeeded, {} failed",
        report.run_id,
        report.outcomes.len(),
        report.success_count(),
        report.failure_count()
    );

    for result in report.succeeded() {
        println!();
        print_analysis(result);
    }

    for failed in report.failed() {
        if let FarmOutcome::Failed { farm_id, reason } = failed {
            println!();
            println!("{}  FAILED: {}", farm_id, reason);
        }
    }
}

fn print_analysis(result: &AnalysisResult) {
    println!(
        "{}  {} ({}, {})",
        result.farm_id, result.zone_name, result.location.district, result.location.state
    );
    if result.recommendations.is_empty() {
        println!("  No variety reaches the suitability threshold");
    } else {
        for &category in VarietyCategory::all() {
            let recs = result.recommendations.get(category);
            if recs.is_empty() {
                println!("  {:<13} none suitable", category.as_str());
                continue;
            }
            for (rank, rec) in recs.iter().enumerate() {
                println!(
                    "  {:<13} {}. {} (score {:.2}, confidence {:.2}, {:.1} tCO2/ha/yr)",
                    if rank == 0 { category.as_str() } else { "" },
                    rank + 1,
                    rec.variety_name,
                    rec.suitability_score,
                    rec.confidence,
                    rec.carbon_potential
                );
            }
        }
    }
    println!(
        "  Carbon: {:.2} tCO2/ha/yr, {:.2} credits, revenue {:.2}",
        result.carbon.realistic_carbon,
        result.carbon.estimated_credits,
        result.carbon.estimated_revenue
    );
}

fn zone(config: &Config, lat: f64, lon: f64) -> Result<()> {
    let engine = build_engine(config)?;
    let (found, location) = engine.locate(lat, lon)?;

    println!("{} - {}", found.zone.id, found.zone.name);
    if found.contained {
        println!("  Match score:  {:.3}", found.score);
    } else {
        println!(
            "  Outside all zones; nearest center is {:.2}° away",
            found.distance
        );
    }
    println!("  Climate:      {}", found.zone.characteristics.climate_type);
    println!("  Rainfall:     {} mm", found.zone.rainfall_range);
    println!("  Temperature:  {} °C", found.zone.temp_range);
    println!("  State:        {}", location.state);
    println!("  District:     {}", location.district);
    Ok(())
}

fn explain(config: &Config, input: &Path, farm_id: &str, variety_id: &str) -> Result<()> {
    let engine = build_engine(config)?;
    let farms = load_farms(input)?;
    let farm = farms
        .iter()
        .find(|f| f.farm_id == farm_id)
        .with_context(|| format!("Farm {} not found in {}", farm_id, input.display()))?;

    let breakdown = engine.explain(farm, variety_id)?;

    println!("{} on farm {} (zone {})", variety_id, farm_id, breakdown.zone_id);
    for point in breakdown.data_points() {
        println!("  {:<22} {:>8}  [{}]", point.label, point.value, point.source);
    }
    let verdict = if breakdown.total >= logic::recommender::SUITABILITY_THRESHOLD {
        "suitable"
    } else {
        "below threshold"
    };
    println!("  => {}", verdict);
    Ok(())
}

fn list_catalog(config: &Config, category: Option<&str>) -> Result<()> {
    let catalog = Catalog::load(&config.catalog)?;

    let filter = match category {
        Some(name) => match VarietyCategory::from_str(name) {
            Some(c) => Some(c),
            None => bail!("Unknown category '{}': use rice, crop or agroforestry", name),
        },
        None => None,
    };

    if filter.is_none() {
        println!("Zones ({})", catalog.zones.len());
        for zone in catalog.zones.zones() {
            println!("  {:<28} {}", zone.id, zone.name);
        }
        println!();
    }

    let varieties: Vec<_> = catalog
        .varieties
        .all()
        .iter()
        .filter(|v| filter.map_or(true, |c| v.category == c))
        .collect();

    println!("Varieties ({})", varieties.len());
    for v in varieties {
        println!(
            "  {:<10} {:<32} {:<13} {:<8} {:>5.1} tCO2  {}",
            v.id,
            v.name,
            v.category.as_str(),
            v.market_value.as_str(),
            v.carbon_potential,
            v.zones.join(", ")
        );
    }
    Ok(())
}

fn history(
    config: &Config,
    data_dir: Option<&Path>,
    limit: usize,
    farm_id: Option<&str>,
) -> Result<()> {
    let db = Database::open(&config.db_path(data_dir)?)?;
    let analyses = match farm_id {
        Some(id) => db
            .analyses_for_farm(id)?
            .into_iter()
            .take(limit)
            .collect(),
        None => db.recent_analyses(limit)?,
    };

    if analyses.is_empty() {
        println!("No stored analyses in {}", db.path().display());
        return Ok(());
    }

    for a in analyses {
        println!(
            "{}  {:<12} {:<26} {:>2} recs  {:>8.2} revenue  {}",
            a.analyzed_at.format("%Y-%m-%d %H:%M"),
            a.farm_id,
            a.detected_zone,
            a.recommendation_count,
            a.estimated_revenue,
            a.analysis_id
        );
    }

    let runs = db.recent_batch_runs(limit)?;
    if let Some(last) = runs.first() {
        let failures = db.failures_for_run(last.run_id)?;
        if !failures.is_empty() {
            println!();
            println!("Failures in run {}:", last.run_id);
            for f in failures {
                println!("  {}: {}", f.farm_id, f.reason);
            }
        }
    }
    Ok(())
}

fn show_analysis(config: &Config, data_dir: Option<&Path>, analysis_id: Uuid) -> Result<()> {
    let db = Database::open(&config.db_path(data_dir)?)?;
    let Some(result) = db.get_analysis(analysis_id)? else {
        bail!("No stored analysis {} in {}", analysis_id, db.path().display());
    };

    println!(
        "Analysis {} ({})",
        result.analysis_id,
        result.analyzed_at.format("%Y-%m-%d %H:%M")
    );
    print_analysis(&result);

    println!();
    println!("Farm profile");
    for (field, value) in result.farm_profile.to_map()? {
        println!("  {:<22} {}", field, value);
    }
    Ok(())
}

fn check(config_path: Option<&Path>, data_dir: Option<&Path>) -> Result<()> {
    let source: PathBuf = match config_path {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from("(defaults or standard locations)"),
    };
    if !Config::exists(config_path) {
        println!("Config: no file found, using defaults");
    }
    let config = load_config(config_path)?;
    println!("Config: OK ({})", source.display());

    let catalog = Catalog::load(&config.catalog)?;
    println!(
        "Catalog: {} zones, {} varieties",
        catalog.zones.len(),
        catalog.varieties.len()
    );
    for id in catalog.varieties.rejected() {
        println!("  rejected: {}", id);
    }

    println!("Scoring factors:");
    for (id, name) in SuitabilityScorer::default().list_factors() {
        println!("  {:<12} {}", id, name);
    }

    let db_path = config.db_path(data_dir)?;
    Database::open(&db_path).with_context(|| format!("Cannot open {}", db_path.display()))?;
    println!("Database: OK ({})", db_path.display());
    Ok(())
}
