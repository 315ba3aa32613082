// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gate Stability Simulator - Circuit Breaker Policy
//
// Pure threshold evaluation. Unlike a tripping breaker there is no latched
// state: every epoch is judged on its own inputs.

use crate::params::{BreakerThresholds, EquilibriumThresholds, PEG};
use crate::types::{CircuitBreakers, EquilibriumStatus, FailingMetric};

/// Evaluate halt / emergency-spread / rebase flags.
///
/// - `halt_trading`: liquidity below `min_liquidity` or LHI below `halt_health`.
/// - `emergency_spreads`: liquidity below `emergency_liquidity` or LHI below `emergency_health`.
/// - `needs_rebase`: `|price - 1|` above `max_price_deviation`.
pub fn evaluate_breakers(
    liquidity_ratio: f64,
    current_price: f64,
    liquidity_health: f64,
    thresholds: &BreakerThresholds,
) -> CircuitBreakers {
    CircuitBreakers {
        halt_trading: liquidity_ratio < thresholds.min_liquidity
            || liquidity_health < thresholds.halt_health,
        emergency_spreads: liquidity_ratio < thresholds.emergency_liquidity
            || liquidity_health < thresholds.emergency_health,
        needs_rebase: (PEG - current_price).abs() > thresholds.max_price_deviation,
    }
}

/// Equilibrium holds iff every index clears its minimum and convergence is
/// fast enough. Failing metrics are reported in check order.
pub fn evaluate_equilibrium(
    psi: f64,
    lhi: f64,
    nus: f64,
    convergence_rate: f64,
    thresholds: &EquilibriumThresholds,
) -> EquilibriumStatus {
    let checks = [
        (FailingMetric::PriceStability, psi >= thresholds.psi_min),
        (FailingMetric::LiquidityHealth, lhi >= thresholds.lhi_min),
        (FailingMetric::NetworkUtility, nus >= thresholds.nus_min),
        (FailingMetric::Convergence, convergence_rate <= thresholds.convergence_max),
    ];
    let failing_metrics: Vec<FailingMetric> = checks
        .iter()
        .filter(|(_, passed)| !passed)
        .map(|(metric, _)| *metric)
        .collect();

    EquilibriumStatus {
        is_equilibrium: failing_metrics.is_empty(),
        failing_metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t() -> BreakerThresholds {
        BreakerThresholds::default()
    }

    #[test]
    fn low_liquidity_and_health_halts() {
        let cb = evaluate_breakers(0.05, 1.0, 0.1, &t());
        assert!(cb.halt_trading);
        assert!(cb.emergency_spreads);
        assert!(!cb.needs_rebase);
    }

    #[test]
    fn large_deviation_needs_rebase() {
        let cb = evaluate_breakers(0.9, 1.5, 0.9, &t());
        assert!(cb.needs_rebase);
        assert!(!cb.halt_trading);
        assert!(!cb.emergency_spreads);
    }

    #[test]
    fn thresholds_are_strict() {
        let cb = evaluate_breakers(0.15, 1.25, 0.5, &t());
        assert!(!cb.halt_trading);
        assert!(!cb.emergency_spreads, "0.15 liquidity and 0.5 health are not below their limits");
        assert!(!cb.needs_rebase);
        let cb = evaluate_breakers(0.10, 1.0, 0.6, &t());
        assert!(!cb.halt_trading, "0.10 is not below 0.10");
    }

    #[test]
    fn floored_health_does_not_halt() {
        let cb = evaluate_breakers(0.8, 1.0, 0.2, &t());
        assert!(!cb.halt_trading);
        assert!(cb.emergency_spreads);
    }

    #[test]
    fn healthy_system_is_in_equilibrium() {
        let eq = evaluate_equilibrium(0.9, 0.8, 0.7, 1.0, &EquilibriumThresholds::default());
        assert!(eq.is_equilibrium);
        assert!(eq.failing_metrics.is_empty());
    }

    #[test]
    fn failing_metrics_are_listed_in_order() {
        let eq = evaluate_equilibrium(0.5, 0.2, 0.1, 50.0, &EquilibriumThresholds::default());
        assert!(!eq.is_equilibrium);
        assert_eq!(
            eq.failing_metrics,
            vec![
                FailingMetric::PriceStability,
                FailingMetric::LiquidityHealth,
                FailingMetric::NetworkUtility,
                FailingMetric::Convergence,
            ]
        );
    }

    #[test]
    fn slow_convergence_alone_breaks_equilibrium() {
        let eq = evaluate_equilibrium(0.9, 0.9, 0.9, 10.5, &EquilibriumThresholds::default());
        assert_eq!(eq.failing_metrics, vec![FailingMetric::Convergence]);
    }
}
