//! PUMPFRONT - Pumping Station Pareto Optimizer
//!
//! Generates a population of candidate operating points, prints the Pareto
//! front, the recommended point and operator guidance.
//!
//! # Usage
//!
//! ```bash
//! # Default station, 1000 solutions
//! pumpfront
//!
//! # Reproducible run with a throughput target and a spare pump enabled
//! pumpfront --seed 42 --target 200 --enable-pump pump3
//!
//! # Override the current configuration and inspect the nearest solution
//! pumpfront --set pressure=10 --set wear=30 --select 120,65 --path
//!
//! # Machine-readable report
//! pumpfront --json > report.json
//! ```
//!
//! # Environment Variables
//!
//! - `PUMPFRONT_CONFIG`: Path to station_config.toml
//! - `RUST_LOG`: Logging level (default: info)

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use pumpfront::config::validation::validate_physical_ranges;
use pumpfront::{
    ClosestSolution, CriterionKind, EquipmentConfig, OptimizationReport, ParetoOptimizer,
    RecommendationSet, StationConfig, Waypoint,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "pumpfront")]
#[command(about = "Pumping station Pareto optimizer")]
#[command(version)]
struct CliArgs {
    /// Station config file (default: $PUMPFRONT_CONFIG, then ./station_config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of candidate solutions to sample
    #[arg(short = 'n', long)]
    solutions: Option<usize>,

    /// RNG seed for a reproducible population
    #[arg(long)]
    seed: Option<u64>,

    /// Override a current value, e.g. --set pressure=12.5 (repeatable)
    #[arg(long = "set", value_name = "KIND=VALUE")]
    overrides: Vec<String>,

    /// Required productivity (m³/h)
    #[arg(long)]
    target: Option<f64>,

    /// Forecast CSV with timestamp,val columns
    #[arg(long, value_name = "CSV")]
    forecast: Option<PathBuf>,

    /// Use the latest forecast value as the required productivity
    #[arg(long)]
    use_forecast: bool,

    /// Disable a pump by id (repeatable)
    #[arg(long = "disable-pump", value_name = "ID")]
    disable_pumps: Vec<String>,

    /// Enable a pump by id (repeatable)
    #[arg(long = "enable-pump", value_name = "ID")]
    enable_pumps: Vec<String>,

    /// Select the solution nearest to THROUGHPUT,EFFICIENCY
    #[arg(long, value_name = "X,Y")]
    select: Option<String>,

    /// Print the transition path to the selection (or the optimum)
    #[arg(long)]
    path: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long, env = "PUMPFRONT_LOG_JSON")]
    log_json: bool,
}

#[derive(Debug, Serialize)]
struct Selection {
    closest: ClosestSolution,
    recommendations: RecommendationSet,
}

#[derive(Debug, Serialize)]
struct CliOutput {
    report: OptimizationReport,
    selection: Option<Selection>,
    path: Option<Vec<Waypoint>>,
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let mut config = match &args.config {
        Some(path) => StationConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => StationConfig::load(),
    };

    if args.seed.is_some() {
        config.sampling.seed = args.seed;
    }
    if let Some(path) = &args.forecast {
        config.forecast.csv_path = Some(path.clone());
    }
    if args.target.is_some() {
        config.forecast.required_productivity = args.target;
    }
    if args.use_forecast {
        config.forecast.use_as_target = true;
    }

    for w in validate_physical_ranges(&config) {
        warn!(field = %w.field, "{}", w);
    }

    info!(
        station = %config.station.name,
        pumps = config.pumps.len(),
        seed = ?config.sampling.seed,
        "Station config ready"
    );

    let mut optimizer = ParetoOptimizer::new(config);
    for id in &args.disable_pumps {
        optimizer.set_pump_enabled(id, false);
    }
    for id in &args.enable_pumps {
        optimizer.set_pump_enabled(id, true);
    }

    let input = parse_overrides(&args.overrides);
    let snapshot = optimizer.generate(args.solutions, &input);

    let selection = match &args.select {
        Some(raw) => {
            let (x, y) = parse_point(raw)?;
            optimizer.find_closest_solution(x, y).map(|closest| Selection {
                closest,
                recommendations: optimizer.recommendations(Some(closest.index)),
            })
        }
        None => None,
    };

    let path: Option<Vec<Waypoint>> = if args.path {
        selection
            .as_ref()
            .map(|s| s.closest.index)
            .or_else(|| snapshot.optimal_index())
            .and_then(|target| optimizer.transition_path(target, optimizer.path_steps()))
            .map(Iterator::collect)
    } else {
        None
    };

    let report = optimizer
        .report()
        .context("No population available after generation")?;

    if args.json {
        let output = CliOutput { report, selection, path };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&report, selection.as_ref(), path.as_deref());
    }

    Ok(())
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Parse `kind=value` overrides; bad entries are skipped with a warning.
fn parse_overrides(raw: &[String]) -> EquipmentConfig {
    let mut input = EquipmentConfig::new();
    for entry in raw {
        let Some((key, value)) = entry.split_once('=') else {
            warn!(entry = %entry, "Ignoring override without '='");
            continue;
        };
        let Some(kind) = CriterionKind::from_key(key) else {
            warn!(key = %key, "Ignoring override for unknown criterion");
            continue;
        };
        match value.trim().parse::<f64>() {
            Ok(v) => input.set(kind, v),
            Err(e) => warn!(key = %key, value = %value, error = %e, "Ignoring non-numeric override"),
        }
    }
    input
}

fn parse_point(raw: &str) -> Result<(f64, f64)> {
    let Some((x, y)) = raw.split_once(',') else {
        bail!("--select expects THROUGHPUT,EFFICIENCY, got '{raw}'");
    };
    let x = x.trim().parse::<f64>().with_context(|| format!("Invalid throughput '{x}'"))?;
    let y = y.trim().parse::<f64>().with_context(|| format!("Invalid efficiency '{y}'"))?;
    Ok((x, y))
}

// ============================================================================
// Text Output
// ============================================================================

fn print_report(report: &OptimizationReport, selection: Option<&Selection>, path: Option<&[Waypoint]>) {
    println!("Station {} | generation {}", report.station, report.generation);
    println!(
        "Population: {} solutions, {} on the Pareto front",
        report.stats.population, report.stats.front_size
    );
    println!("Active pumps: {}", report.active_pumps.join(", "));
    if let Some(target) = report.required_productivity {
        println!("Required productivity: {target:.1} m³/h");
    }
    println!(
        "Baseline: {:.1} m³/h at {:.1}%",
        report.baseline_objectives.throughput, report.baseline_objectives.efficiency
    );

    match &report.optimal {
        Some(opt) => {
            println!(
                "Optimal point #{}: {:.1} m³/h at {:.1}% (score {:.2})",
                opt.index, opt.objectives.throughput, opt.objectives.efficiency, opt.objectives.composite
            );
            for (kind, value) in opt.config.iter() {
                println!("  {kind}: {value:.2}");
            }
        }
        None => println!("Optimal point: none"),
    }

    println!("\nPareto front (throughput, efficiency):");
    for point in &report.pareto_front {
        println!("  #{:<5} {:>8.1} {:>6.1}", point.index, point.throughput, point.efficiency);
    }

    println!("\nRecommendations:");
    for line in report.recommendations.lines() {
        println!("  - {line}");
    }

    if let Some(sel) = selection {
        println!(
            "\nNearest solution #{} (distance {:.2}):",
            sel.closest.index, sel.closest.distance
        );
        for line in sel.recommendations.lines() {
            println!("  - {line}");
        }
    }

    if let Some(points) = path {
        println!("\nTransition path:");
        for wp in points {
            println!(
                "  step {:>2} ({:>5.1}%): {:>8.1} m³/h {:>6.1}%",
                wp.step,
                wp.fraction * 100.0,
                wp.throughput,
                wp.efficiency
            );
        }
    }
}
