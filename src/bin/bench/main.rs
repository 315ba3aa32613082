// Gate Scenario Bench v0.1.0: stress-scenario batches for the epoch engine
// Monte Carlo over seeded initial conditions, JSON report, optional JSONL time series
//
// Usage:
//   cargo run --release --bin bench                        # All scenarios (30 runs each)
//   cargo run --release --bin bench -- --runs 1            # Deterministic baseline only
//   cargo run --release --bin bench -- crisis              # Filter by name, label or category
//   cargo run --release --bin bench -- --epochs 2000       # Shorter horizon
//   cargo run --release --bin bench -- --time-series       # Enable JSONL output
//   cargo run --release --bin bench -- --seed 42           # Custom base seed
//   cargo run --release --bin bench -- --config econ.json  # Override constants
//
// Set RUST_LOG=gate_engine=debug for per-epoch traces.

mod metrics;
mod monte_carlo;
mod perturbation;
mod report;
mod scenarios;
mod time_series;

use gate_engine::{EconomicsConfig, TransitionRules};
use monte_carlo::BatchSettings;
use perturbation::JitterBounds;
use report::*;
use scenarios::*;
use serde::Deserialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    epochs: u64,
    time_series: bool,
    config: Option<PathBuf>,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 30,
        seed: 0,
        epochs: 10_000,
        time_series: false,
        config: None,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(30);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--epochs" => {
                i += 1;
                if i < args.len() {
                    cli.epochs = args[i].parse().unwrap_or(10_000);
                }
            }
            "--config" => {
                i += 1;
                if i < args.len() {
                    cli.config = Some(PathBuf::from(&args[i]));
                }
            }
            "--time-series" => {
                cli.time_series = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

// ─── Config File ────────────────────────────────────────────────────────────

/// Optional JSON overrides; omitted sections keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BenchConfig {
    economics: EconomicsConfig,
    rules: TransitionRules,
}

fn load_config(path: Option<&Path>) -> Result<BenchConfig, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(BenchConfig::default());
    };
    let text = std::fs::read_to_string(path)?;
    let cfg: BenchConfig = serde_json::from_str(&text)?;
    cfg.economics.validate()?;
    cfg.rules.validate()?;
    log::info!("loaded config from {}", path.display());
    Ok(cfg)
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    match run(parse_args()) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("  Error: {}", e);
            std::process::exit(2);
        }
    }
}

/// Returns whether every scenario passed.
fn run(cli: CliArgs) -> Result<bool, Box<dyn Error>> {
    let cfg = load_config(cli.config.as_deref())?;
    let all_scenarios = scenarios();

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios.iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower)
                          || s.category.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        return Err(format!("no scenarios match filter: {:?}", cli.filter).into());
    }

    let ts_root = Path::new("benchmark-results/time-series");

    println!("\n  Gate Scenario Bench v0.1.0");
    println!("  PRNG: ChaCha8Rng | Runs/scenario: {} | Epochs/run: {} | Base seed: {}",
        cli.runs, cli.epochs, cli.seed);
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!("  {:<50} {:>5} {:>7} {:>7} {:>7} {:>9} {:>8} {:>7} {:>7}",
        "Scenario", "Pass%", "PSI", "NUS", "LHI", "Final", "Streak", "Recov", "Time");
    println!("  {}", "-".repeat(118));

    let suite_start = Instant::now();
    let mut mc_reports = Vec::new();

    for scenario in &to_run {
        let ts_dir = cli.time_series.then(|| ts_root.join(scenario.name.to_lowercase()));
        let settings = BatchSettings {
            epochs: cli.epochs,
            config: &cfg.economics,
            rules: &cfg.rules,
            jitter: JitterBounds::default(),
            time_series_dir: ts_dir.as_deref(),
        };
        let report = monte_carlo::run_monte_carlo(scenario, cli.runs, cli.seed, &settings)?;

        let pass_pct = report.pass_rate * 100.0;
        let status = if pass_pct >= 93.3 { "PASS" } else { "FAIL" };
        let recovery = if report.recovery_epochs.n > 0 {
            format!("{:.0}", report.recovery_epochs.mean)
        } else {
            "-".to_string()
        };

        println!("  {:<50} {:>4}% {:>7.4} {:>7.4} {:>7.4} {:>9.5} {:>8.0} {:>7} {:>5.0}ms  {}",
            report.label,
            pass_pct as u32,
            report.mean_psi.mean,
            report.mean_nus.mean,
            report.mean_lhi.mean,
            report.final_price.mean,
            report.longest_equilibrium_streak.mean,
            recovery,
            report.elapsed_ms.mean,
            status,
        );

        mc_reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Summary ────────────────────────────────────────────────────────

    let total = mc_reports.len();
    let passed = mc_reports.iter().filter(|r| r.pass_rate >= 0.933).count();
    let failed = total - passed;

    println!("  {}", "-".repeat(118));
    println!("  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total, passed, failed, suite_elapsed.as_secs_f64());

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
    let timestamp = format!("{}", ts);

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: "0.1.0",
        prng: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        epochs_per_run: cli.epochs,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: passed as f64 / total as f64,
        },
        scenarios: mc_reports,
    };

    let dir = Path::new("benchmark-results");
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("bench-{}.json", timestamp));
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&path, &json)?;
    println!("  Results saved to: {}\n", path.display());

    Ok(failed == 0)
}
