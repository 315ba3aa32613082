// Per-Run Analysis: indicator statistics, equilibrium streaks, recovery periods
// Reduces one result sequence to the figures the report aggregates

use gate_engine::EpochResult;
use serde::Serialize;

use crate::report::Stats;

// ─── Recovery Periods ───────────────────────────────────────────────────────

/// Epochs from a halt or rebase until the next equilibrium epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveryPeriod {
    pub start_epoch: u64,
    /// `None` when the run ended before equilibrium returned.
    pub end_epoch: Option<u64>,
}

impl RecoveryPeriod {
    pub fn length(&self) -> Option<u64> {
        self.end_epoch.map(|end| end - self.start_epoch)
    }
}

/// Scan for crisis-to-equilibrium windows. A crisis epoch that is itself in
/// equilibrium opens and closes nothing.
pub fn recovery_periods(results: &[EpochResult]) -> Vec<RecoveryPeriod> {
    let mut periods = Vec::new();
    let mut open: Option<u64> = None;

    for r in results {
        let crisis = r.circuit_breakers.halt_trading || r.circuit_breakers.needs_rebase;
        match open {
            None if crisis && !r.equilibrium.is_equilibrium => open = Some(r.epoch),
            Some(start) if r.equilibrium.is_equilibrium => {
                periods.push(RecoveryPeriod { start_epoch: start, end_epoch: Some(r.epoch) });
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        periods.push(RecoveryPeriod { start_epoch: start, end_epoch: None });
    }
    periods
}

/// Longest run of consecutive equilibrium epochs.
pub fn longest_equilibrium_streak(results: &[EpochResult]) -> usize {
    let mut best = 0;
    let mut current = 0;
    for r in results {
        if r.equilibrium.is_equilibrium {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

// ─── Run Analysis ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RunAnalysis {
    pub epochs: usize,
    pub price_stability_index: Stats,
    pub network_utility_score: Stats,
    pub liquidity_health_index: Stats,
    pub market_pressure: Stats,
    pub convergence_rate: Stats,
    pub dynamic_spread: Stats,
    pub mean_epoch_duration: f64,
    pub equilibrium_epochs: usize,
    pub longest_equilibrium_streak: usize,
    pub halt_epochs: usize,
    pub rebase_epochs: usize,
    pub recovery_periods: Vec<RecoveryPeriod>,
    pub final_price: f64,
    pub final_in_equilibrium: bool,
    pub final_halt: bool,
}

impl RunAnalysis {
    pub fn from_results(results: &[EpochResult]) -> Self {
        let series = |f: fn(&EpochResult) -> f64| -> Stats {
            Stats::from_samples(&results.iter().map(f).collect::<Vec<_>>())
        };
        let last = results.last();

        Self {
            epochs: results.len(),
            price_stability_index: series(|r| r.price_stability_index),
            network_utility_score: series(|r| r.network_utility_score),
            liquidity_health_index: series(|r| r.liquidity_health_index),
            market_pressure: series(|r| r.market_pressure),
            convergence_rate: series(|r| r.convergence_rate),
            dynamic_spread: series(|r| r.dynamic_spread),
            mean_epoch_duration: series(|r| r.epoch_duration as f64).mean,
            equilibrium_epochs: results.iter().filter(|r| r.equilibrium.is_equilibrium).count(),
            longest_equilibrium_streak: longest_equilibrium_streak(results),
            halt_epochs: results.iter().filter(|r| r.circuit_breakers.halt_trading).count(),
            rebase_epochs: results.iter().filter(|r| r.circuit_breakers.needs_rebase).count(),
            recovery_periods: recovery_periods(results),
            final_price: last.map(|r| r.current_price).unwrap_or(0.0),
            final_in_equilibrium: last.map(|r| r.equilibrium.is_equilibrium).unwrap_or(false),
            final_halt: last.map(|r| r.circuit_breakers.halt_trading).unwrap_or(false),
        }
    }

    /// Mean length of the recovery periods that closed.
    pub fn mean_recovery_epochs(&self) -> Option<f64> {
        let closed: Vec<f64> = self.recovery_periods.iter().filter_map(|p| p.length()).map(|l| l as f64).collect();
        if closed.is_empty() {
            None
        } else {
            Some(closed.iter().sum::<f64>() / closed.len() as f64)
        }
    }
}
