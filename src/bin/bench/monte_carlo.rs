// Monte Carlo Infrastructure: N seeded runs per scenario with statistical aggregation
// Run i uses seed base+i; runs share nothing and execute on the rayon pool

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use gate_engine::{EconomicsConfig, EngineError, SimulationRun, TransitionRules};

use crate::metrics::RunAnalysis;
use crate::perturbation::{JitterBounds, Perturbation};
use crate::report::*;
use crate::scenarios::Scenario;
use crate::time_series;

use std::path::Path;
use std::time::Instant;

/// Settings shared by every run of a batch.
pub struct BatchSettings<'a> {
    pub epochs: u64,
    pub config: &'a EconomicsConfig,
    pub rules: &'a TransitionRules,
    pub jitter: JitterBounds,
    pub time_series_dir: Option<&'a Path>,
}

/// Run a single scenario iteration with a specific seed.
/// With `perturb` unset the scenario's own starting point is used as-is.
pub fn run_single(
    scenario: &Scenario,
    seed: u64,
    perturb: bool,
    settings: &BatchSettings<'_>,
) -> Result<BenchResult, EngineError> {
    let start = Instant::now();

    let base = scenario.initial_params()?;
    let initial = if perturb {
        Perturbation::new(ChaCha8Rng::seed_from_u64(seed), settings.jitter).perturb(&base)?
    } else {
        base
    };
    let initial_price = initial.current_price();

    let mut run = SimulationRun::with_config(initial, settings.config.clone(), settings.rules.clone())?;
    run.run(settings.epochs)?;

    let analysis = RunAnalysis::from_results(run.results());

    if let Some(dir) = settings.time_series_dir {
        let path = dir.join(format!("seed-{}.jsonl", seed));
        let ledger = run.supply();
        if let Err(e) = time_series::write_jsonl(&path, run.results(), |epoch| ledger.supply_at(epoch)) {
            log::warn!("failed to write time series {}: {}", path.display(), e);
        }
    }

    let c = &scenario.criteria;
    let mut pass = (analysis.final_price - 1.0).abs() <= c.max_final_deviation;
    if c.require_no_final_halt && analysis.final_halt {
        pass = false;
    }
    if let Some(max) = c.max_rebases {
        if analysis.rebase_epochs > max {
            pass = false;
        }
    }

    Ok(BenchResult {
        scenario: scenario.label.to_string(),
        name: scenario.name.to_string(),
        category: scenario.category.to_string(),
        seed,
        perturbed: perturb,
        pass,
        initial_price,
        supply_inflation_pct: run.supply().cumulative_inflation_pct(),
        rebase_events: run.supply().events().len(),
        elapsed_ms: start.elapsed().as_millis(),
        analysis,
    })
}

/// Run Monte Carlo: N runs of a scenario, aggregate stats.
///
/// A single run uses the unperturbed scenario; larger batches jitter every
/// run's starting point from its own seed.
pub fn run_monte_carlo(
    scenario: &Scenario,
    n_runs: usize,
    base_seed: u64,
    settings: &BatchSettings<'_>,
) -> Result<MonteCarloReport, EngineError> {
    let perturb = n_runs > 1;
    let results = (0..n_runs)
        .into_par_iter()
        .map(|i| run_single(scenario, base_seed + i as u64, perturb, settings))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(aggregate(scenario, results))
}

/// Aggregate individual runs into a MonteCarloReport.
fn aggregate(scenario: &Scenario, results: Vec<BenchResult>) -> MonteCarloReport {
    let n = results.len();
    let passed = results.iter().filter(|r| r.pass).count();
    let pass_rate = if n > 0 { passed as f64 / n as f64 } else { 0.0 };

    let across = |f: &dyn Fn(&BenchResult) -> f64| -> Stats {
        Stats::from_samples(&results.iter().map(f).collect::<Vec<_>>())
    };

    let recovery: Vec<f64> = results.iter().filter_map(|r| r.analysis.mean_recovery_epochs()).collect();

    MonteCarloReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        category: scenario.category.to_string(),
        n_runs: n,
        pass_rate,
        mean_psi: across(&|r| r.analysis.price_stability_index.mean),
        mean_nus: across(&|r| r.analysis.network_utility_score.mean),
        mean_lhi: across(&|r| r.analysis.liquidity_health_index.mean),
        mean_pressure: across(&|r| r.analysis.market_pressure.mean),
        mean_spread: across(&|r| r.analysis.dynamic_spread.mean),
        final_price: across(&|r| r.analysis.final_price),
        equilibrium_fraction: across(&|r| {
            r.analysis.equilibrium_epochs as f64 / r.analysis.epochs.max(1) as f64
        }),
        longest_equilibrium_streak: across(&|r| r.analysis.longest_equilibrium_streak as f64),
        recovery_epochs: Stats::from_samples(&recovery),
        supply_inflation_pct: across(&|r| r.supply_inflation_pct),
        elapsed_ms: across(&|r| r.elapsed_ms as f64),
        individual_runs: results,
    }
}
