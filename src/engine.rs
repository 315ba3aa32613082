// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gate Stability Simulator - Epoch Engine

//! One-epoch transform: `(EpochParameters, MarketWindowState) -> EpochResult`.
//!
//! The window is mutated in place (exactly one observation appended). Steps
//! run in strict dependency order; no value is read before it is computed.

use log::{debug, warn};

use crate::circuit_breaker::{evaluate_breakers, evaluate_equilibrium};
use crate::error::Result;
use crate::formulas;
use crate::market_window::MarketWindowState;
use crate::params::{EconomicsConfig, PEG};
use crate::types::{EpochParameters, EpochResult};

/// Stateless epoch evaluator bound to one immutable configuration.
#[derive(Debug, Clone)]
pub struct EpochEngine {
    config: EconomicsConfig,
}

impl EpochEngine {
    /// Engine with a validated configuration.
    pub fn new(config: EconomicsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EconomicsConfig {
        &self.config
    }

    /// Fresh window shaped by this engine's configuration.
    pub fn new_window(&self) -> MarketWindowState {
        MarketWindowState::from_config(&self.config.window)
    }

    /// Evaluate one epoch. Parameters are revalidated before any step runs,
    /// so an invalid input leaves `window` untouched.
    pub fn run_epoch(
        &self,
        epoch: u64,
        params: &EpochParameters,
        window: &mut MarketWindowState,
    ) -> Result<EpochResult> {
        params.validate()?;
        let cfg = &self.config;

        // 1. Market pressure from current flows
        let pressure = formulas::market_pressure(
            params.buys_volume,
            params.sells_volume,
            params.liquidity_pool(),
            params.validator_count,
        );

        // 2. Record this epoch's observation
        window.update(params.current_price, params.daily_transactions, pressure);

        // 3. Window-derived signals
        let volatility = window.volatility();
        let volume_weight = window.volume_weight();
        let weighted_pressure = window.weighted_pressure();
        let pressure_trend = window.pressure_trend();
        let network_throughput = params.validator_count as f64 * cfg.targets.validator_capacity;
        let epoch_duration = formulas::epoch_duration(
            params.daily_transactions,
            network_throughput,
            volatility,
            &cfg.timing,
        );

        // 4. Composite indices
        let validator_participation =
            formulas::validator_participation(params.validator_count, params.total_holders);
        let holder_participation =
            formulas::holder_participation(params.daily_transactions, params.total_holders);
        let psi = formulas::price_stability_index(
            params.current_price,
            pressure,
            validator_participation,
            holder_participation,
            &cfg.weights,
        );
        let nus = formulas::network_utility_score(
            params.daily_transactions,
            params.cross_chain_transfers,
            &cfg.targets,
            &cfg.weights,
        );
        let required_reserve = formulas::stability_reserve_requirement(
            cfg.targets.total_supply,
            cfg.targets.daily_decay_penalties,
            &cfg.weights,
        );
        let lhi = formulas::liquidity_health_index(
            params.validator_count as f64,
            params.total_holders,
            params.liquidity_ratio,
            params.stability_reserve,
            required_reserve,
            &cfg.targets,
            &cfg.weights,
        );

        // 5. Circuit breakers
        let breakers = evaluate_breakers(params.liquidity_ratio, params.current_price, lhi, &cfg.breakers);

        // 6. Flows, spread, settlement, convergence
        let spread = if breakers.emergency_spreads {
            formulas::emergency_spread(params.liquidity_ratio, cfg.breakers.emergency_spread_cap, &cfg.rates)
        } else {
            let volume_ratio = params.daily_transactions / cfg.targets.daily_volume;
            formulas::dynamic_spread(params.liquidity_ratio, volume_ratio, &cfg.rates)
        };
        let reward = formulas::validator_reward(params.daily_transactions, params.validator_count, psi, &cfg.rates);
        let cost = formulas::holder_cost(params.days_held, params.avg_holding_balance, psi, &cfg.rates);
        let net = formulas::validator_holder_net(cost, reward, validator_participation);
        let fee = formulas::transaction_fee(params.avg_transaction_size, params.liquidity_ratio, psi, &cfg.rates);
        let settlement = formulas::settlement_rate(
            params.daily_transactions,
            params.validator_count,
            params.liquidity_ratio,
            pressure,
            &cfg.targets,
            &cfg.settlement,
        );
        let convergence = formulas::convergence_rate(params.current_price, PEG, pressure, psi);

        // 7. Equilibrium
        let equilibrium = evaluate_equilibrium(psi, lhi, nus, convergence, &cfg.equilibrium);

        if breakers.halt_trading {
            warn!(
                "epoch {}: trading halted (liquidity {:.4}, lhi {:.4})",
                epoch, params.liquidity_ratio, lhi
            );
        }
        if breakers.needs_rebase {
            warn!("epoch {}: rebase required at price {:.4}", epoch, params.current_price);
        }
        debug!(
            "epoch {}: price {:.5} psi {:.4} nus {:.4} lhi {:.4} pressure {:+.4} conv {:.3} eq {}",
            epoch, params.current_price, psi, nus, lhi, pressure, convergence, equilibrium.is_equilibrium
        );

        // 8. Assemble
        Ok(EpochResult {
            epoch,
            price_stability_index: psi,
            network_utility_score: nus,
            liquidity_health_index: lhi,
            market_pressure: pressure,
            convergence_rate: convergence,
            settlement_rate: settlement,
            daily_validator_reward_usdc: reward,
            daily_holder_cost_usdc: cost,
            validator_holder_net_usdc: net,
            transaction_fee_usdc: fee,
            dynamic_spread: spread,
            circuit_breakers: breakers,
            equilibrium,
            epoch_duration,
            market_volatility: volatility,
            volume_weight,
            weighted_pressure,
            pressure_trend,
            current_price: params.current_price,
            liquidity_ratio: params.liquidity_ratio,
            daily_transactions: params.daily_transactions,
            total_holders: params.total_holders,
        })
    }
}

impl Default for EpochEngine {
    fn default() -> Self {
        Self { config: EconomicsConfig::default() }
    }
}

/// Run one epoch with the default configuration.
pub fn run_epoch(epoch: u64, params: &EpochParameters, window: &mut MarketWindowState) -> Result<EpochResult> {
    EpochEngine::default().run_epoch(epoch, params, window)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FailingMetric;

    fn stable() -> EpochParameters {
        EpochParameters::builder(5_000, 1_000_000.0, 1.001)
            .daily_transactions(35_000_000.0)
            .avg_transaction_size(6_000.0)
            .avg_holding_balance(10_000.0)
            .days_held(30.0)
            .liquidity_ratio(0.8)
            .cross_chain_transfers(100_000.0)
            .buys_volume(109e9)
            .sells_volume(109e9)
            .build()
            .expect("test: valid params")
    }

    #[test]
    fn stable_market_epoch() {
        let mut window = MarketWindowState::default();
        let r = run_epoch(0, &stable(), &mut window).expect("test: epoch");
        assert!(!r.circuit_breakers.halt_trading);
        assert!(!r.circuit_breakers.needs_rebase);
        assert!((0.7..=1.0).contains(&r.price_stability_index), "psi {}", r.price_stability_index);
        assert_eq!(r.market_pressure, 0.0);
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn stable_market_reports_floored_liquidity_health() {
        // 5000 validators over 1e6 holders keeps participation tiny
        let mut window = MarketWindowState::default();
        let r = run_epoch(0, &stable(), &mut window).expect("test: epoch");
        assert_eq!(r.liquidity_health_index, 0.2);
        assert!(r.circuit_breakers.emergency_spreads);
        assert!(r.equilibrium.failing_metrics.contains(&FailingMetric::LiquidityHealth));
        // emergency spread replaces the dynamic spread
        assert!((r.dynamic_spread - 0.001 * (0.2 / 0.8)).abs() < 1e-15);
    }

    #[test]
    fn crisis_epoch_trips_halt_and_rebase() {
        let params = stable()
            .to_builder()
            .liquidity_ratio(0.05)
            .current_price(0.55)
            .build()
            .expect("test: valid");
        let mut window = MarketWindowState::default();
        let r = run_epoch(3, &params, &mut window).expect("test: epoch");
        assert!(r.circuit_breakers.needs_rebase);
        assert!(r.circuit_breakers.halt_trading);
        assert_eq!(r.epoch, 3);
    }

    #[test]
    fn identical_inputs_give_identical_results() {
        let mut w1 = MarketWindowState::default();
        let mut w2 = MarketWindowState::default();
        let a = run_epoch(0, &stable(), &mut w1).expect("test: epoch");
        let b = run_epoch(0, &stable(), &mut w2).expect("test: epoch");
        assert_eq!(a, b);
        assert_eq!(w1, w2);
    }

    #[test]
    fn window_feeds_volatility() {
        let engine = EpochEngine::default();
        let mut window = engine.new_window();
        let p1 = stable();
        let p2 = p1.to_builder().current_price(1.05).build().expect("test: valid");
        engine.run_epoch(0, &p1, &mut window).expect("test: epoch");
        let r = engine.run_epoch(1, &p2, &mut window).expect("test: epoch");
        assert!(r.market_volatility > 0.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = EconomicsConfig::default();
        cfg.targets.cross_chain_transfers = 0.0;
        assert!(EpochEngine::new(cfg).is_err());
    }
}
