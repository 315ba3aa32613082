// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gate Stability Simulator - Simulation Driver

use log::info;
use serde::{Deserialize, Serialize};

use crate::engine::EpochEngine;
use crate::error::Result;
use crate::market_window::MarketWindowState;
use crate::params::{EconomicsConfig, TransitionRules, PEG};
use crate::supply::SupplyLedger;
use crate::types::{EpochParameters, EpochResult};

// ─── Transition Policy ──────────────────────────────────────────────────────

/// Floor for compounding holder decay; keeps `total_holders` positive.
const MIN_TOTAL_HOLDERS: f64 = f64::MIN_POSITIVE;

/// Ceiling for compounding transaction growth; keeps `daily_transactions`
/// finite and leaves headroom for the window's volume sums.
const MAX_DAILY_TRANSACTIONS: f64 = 1e300;

/// Maps one epoch's parameters and outcome to the next epoch's parameters.
pub trait TransitionPolicy {
    fn advance(&self, current: &EpochParameters, result: &EpochResult) -> Result<EpochParameters>;
}

/// Heuristic stabilization dynamics: rebase, peg drift, volume rebalancing,
/// liquidity recovery, and participation growth or decay.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StabilizationPolicy {
    pub rules: TransitionRules,
}

impl StabilizationPolicy {
    pub fn new(rules: TransitionRules) -> Self {
        Self { rules }
    }
}

impl TransitionPolicy for StabilizationPolicy {
    fn advance(&self, current: &EpochParameters, result: &EpochResult) -> Result<EpochParameters> {
        let r = &self.rules;
        let mut next = current.clone();

        // Rebase: halfway to peg, bounded
        if result.circuit_breakers.needs_rebase {
            next.current_price = ((PEG + next.current_price) / 2.0).clamp(r.rebase_floor, r.rebase_ceiling);
        }

        // Gradual drift toward peg outside the dead band
        if (next.current_price - PEG).abs() > r.drift_dead_band {
            next.current_price += (PEG - next.current_price) * r.drift_rate;

            let volume_delta = (next.buys_volume - next.sells_volume) * r.volume_rebalance;
            next.buys_volume -= volume_delta;
            next.sells_volume += volume_delta;
        }

        if next.liquidity_ratio < r.liquidity_recovery_below {
            next.liquidity_ratio = (next.liquidity_ratio * r.liquidity_growth).min(r.liquidity_cap);
        }

        if result.price_stability_index < r.stable_psi {
            next.daily_transactions *= r.unstable_tx_factor;
            next.total_holders *= r.unstable_holder_factor;
        } else {
            next.daily_transactions *= r.stable_tx_factor;
            next.total_holders *= r.stable_holder_factor;
        }
        next.daily_transactions = next.daily_transactions.min(MAX_DAILY_TRANSACTIONS);
        next.total_holders = next.total_holders.clamp(MIN_TOTAL_HOLDERS, f64::MAX);

        next.validate()?;
        Ok(next)
    }
}

// ─── Simulation Run ─────────────────────────────────────────────────────────

/// One independent, strictly sequential simulation.
///
/// Owns its window, its current parameters and its result history; nothing
/// is shared with other runs. Hosts may stop between any two [`step`](Self::step)
/// calls.
pub struct SimulationRun<P: TransitionPolicy = StabilizationPolicy> {
    engine: EpochEngine,
    policy: P,
    initial_params: EpochParameters,
    params: EpochParameters,
    window: MarketWindowState,
    supply: SupplyLedger,
    results: Vec<EpochResult>,
}

impl SimulationRun<StabilizationPolicy> {
    /// Run with default configuration and default stabilization rules.
    pub fn new(initial: EpochParameters) -> Self {
        Self::from_parts(EpochEngine::default(), StabilizationPolicy::default(), initial)
    }

    pub fn with_config(initial: EpochParameters, config: EconomicsConfig, rules: TransitionRules) -> Result<Self> {
        rules.validate()?;
        initial.validate()?;
        Ok(Self::from_parts(EpochEngine::new(config)?, StabilizationPolicy::new(rules), initial))
    }
}

impl<P: TransitionPolicy> SimulationRun<P> {
    pub fn from_parts(engine: EpochEngine, policy: P, initial: EpochParameters) -> Self {
        let window = engine.new_window();
        Self {
            engine,
            policy,
            params: initial.clone(),
            initial_params: initial,
            window,
            supply: SupplyLedger::default(),
            results: Vec::new(),
        }
    }

    /// Evaluate the next epoch and advance parameters for the one after.
    ///
    /// A step either commits fully or not at all: on error the window, the
    /// supply ledger, the parameters and the results are left as they were,
    /// so the same epoch can be retried.
    pub fn step(&mut self) -> Result<&EpochResult> {
        let epoch = self.results.len() as u64;
        let mut window = self.window.clone();
        let result = self.engine.run_epoch(epoch, &self.params, &mut window)?;
        let next = self.policy.advance(&self.params, &result)?;

        self.window = window;
        if result.circuit_breakers.needs_rebase {
            self.supply.apply_rebase(epoch, result.current_price);
        }
        self.params = next;
        self.results.push(result);
        Ok(&self.results[self.results.len() - 1])
    }

    /// Run `epochs` more epochs. Crisis epochs are recorded, not errors.
    pub fn run(&mut self, epochs: u64) -> Result<&[EpochResult]> {
        let start = self.results.len();
        info!("running {} epochs from epoch {}", epochs, start);
        for _ in 0..epochs {
            self.step()?;
        }
        if let Some(last) = self.results.last() {
            info!(
                "finished at epoch {}: price {:.5} psi {:.4} equilibrium {}",
                last.epoch, last.current_price, last.price_stability_index, last.equilibrium.is_equilibrium
            );
        }
        Ok(&self.results[start..])
    }

    /// Discard all progress and return to the initial parameters.
    pub fn reset(&mut self) {
        self.params = self.initial_params.clone();
        self.window = self.engine.new_window();
        self.supply = SupplyLedger::default();
        self.results.clear();
    }

    /// Parameters the next epoch will run with.
    pub fn params(&self) -> &EpochParameters {
        &self.params
    }

    pub fn window(&self) -> &MarketWindowState {
        &self.window
    }

    pub fn supply(&self) -> &SupplyLedger {
        &self.supply
    }

    pub fn results(&self) -> &[EpochResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<EpochResult> {
        self.results
    }
}

// ─── Entry Points ───────────────────────────────────────────────────────────

/// Run `epoch_count` epochs with default configuration and rules.
///
/// Compounding participation saturates rather than failing: holders stop
/// decaying at the smallest positive `f64` and transactions stop growing at
/// 1e300, so arbitrarily long horizons stay valid.
pub fn run_simulation(initial: EpochParameters, epoch_count: u64) -> Result<Vec<EpochResult>> {
    let mut run = SimulationRun::new(initial);
    run.run(epoch_count)?;
    Ok(run.into_results())
}

/// Run independent simulations on the rayon pool.
///
/// Runs share no state; output order matches input order.
#[cfg(not(target_arch = "wasm32"))]
pub fn run_parallel(
    initials: Vec<EpochParameters>,
    epoch_count: u64,
    config: &EconomicsConfig,
    rules: &TransitionRules,
) -> Vec<Result<Vec<EpochResult>>> {
    use rayon::prelude::*;

    initials
        .into_par_iter()
        .map(|initial| -> Result<Vec<EpochResult>> {
            let mut run = SimulationRun::with_config(initial, config.clone(), rules.clone())?;
            run.run(epoch_count)?;
            Ok(run.into_results())
        })
        .collect()
}

// ─── Tests ──────────────────────────────────────────────────────────────────
