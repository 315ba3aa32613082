// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gate Stability Simulator - Type Definitions

use serde::{Deserialize, Serialize};

use crate::error::{
    ensure_non_negative, ensure_positive, ensure_unit_interval, EngineError, Result,
};

// ─── Epoch Parameters ───────────────────────────────────────────────────────

/// Validated market and participation inputs for one epoch.
///
/// Only obtainable through [`EpochParametersBuilder::build`] or serde
/// deserialization, both of which validate. `total_holders` is a positive
/// real because the driver scales it fractionally between epochs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParameters", into = "RawParameters")]
pub struct EpochParameters {
    pub(crate) validator_count: u64,
    pub(crate) total_holders: f64,
    pub(crate) daily_transactions: f64,
    pub(crate) current_price: f64,
    pub(crate) avg_transaction_size: f64,
    pub(crate) avg_holding_balance: f64,
    pub(crate) days_held: f64,
    pub(crate) liquidity_ratio: f64,
    pub(crate) cross_chain_transfers: f64,
    pub(crate) buys_volume: f64,
    pub(crate) sells_volume: f64,
    pub(crate) stability_reserve: f64,
}

impl EpochParameters {
    /// Start a builder with the three inputs that have no sensible default.
    pub fn builder(validator_count: u64, total_holders: f64, current_price: f64) -> EpochParametersBuilder {
        EpochParametersBuilder {
            raw: RawParameters {
                validator_count,
                total_holders,
                current_price,
                ..RawParameters::default()
            },
        }
    }

    /// Builder pre-filled with this value, for deriving a modified copy.
    pub fn to_builder(&self) -> EpochParametersBuilder {
        EpochParametersBuilder { raw: RawParameters::from(self.clone()) }
    }

    /// Check every field invariant.
    pub fn validate(&self) -> Result<()> {
        if self.validator_count == 0 {
            return Err(EngineError::InvalidParameter {
                name: "validator_count",
                value: 0.0,
                requirement: "a positive integer",
            });
        }
        ensure_positive("total_holders", self.total_holders)?;
        ensure_positive("current_price", self.current_price)?;
        ensure_unit_interval("liquidity_ratio", self.liquidity_ratio)?;
        ensure_non_negative("daily_transactions", self.daily_transactions)?;
        ensure_non_negative("avg_transaction_size", self.avg_transaction_size)?;
        ensure_non_negative("avg_holding_balance", self.avg_holding_balance)?;
        ensure_non_negative("days_held", self.days_held)?;
        ensure_non_negative("cross_chain_transfers", self.cross_chain_transfers)?;
        ensure_non_negative("buys_volume", self.buys_volume)?;
        ensure_non_negative("sells_volume", self.sells_volume)?;
        ensure_non_negative("stability_reserve", self.stability_reserve)?;
        Ok(())
    }

    pub fn validator_count(&self) -> u64 { self.validator_count }
    pub fn total_holders(&self) -> f64 { self.total_holders }
    pub fn daily_transactions(&self) -> f64 { self.daily_transactions }
    pub fn current_price(&self) -> f64 { self.current_price }
    pub fn avg_transaction_size(&self) -> f64 { self.avg_transaction_size }
    pub fn avg_holding_balance(&self) -> f64 { self.avg_holding_balance }
    pub fn days_held(&self) -> f64 { self.days_held }
    pub fn liquidity_ratio(&self) -> f64 { self.liquidity_ratio }
    pub fn cross_chain_transfers(&self) -> f64 { self.cross_chain_transfers }
    pub fn buys_volume(&self) -> f64 { self.buys_volume }
    pub fn sells_volume(&self) -> f64 { self.sells_volume }
    pub fn stability_reserve(&self) -> f64 { self.stability_reserve }

    /// Liquidity available to absorb flow: ratio × reserve.
    pub fn liquidity_pool(&self) -> f64 {
        self.liquidity_ratio * self.stability_reserve
    }
}

/// Unvalidated wire shape of [`EpochParameters`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RawParameters {
    pub validator_count: u64,
    pub total_holders: f64,
    pub daily_transactions: f64,
    pub current_price: f64,
    pub avg_transaction_size: f64,
    pub avg_holding_balance: f64,
    pub days_held: f64,
    pub liquidity_ratio: f64,
    pub cross_chain_transfers: f64,
    pub buys_volume: f64,
    pub sells_volume: f64,
    pub stability_reserve: f64,
}

impl Default for RawParameters {
    fn default() -> Self {
        Self {
            validator_count: 0,
            total_holders: 0.0,
            daily_transactions: 0.0,
            current_price: 1.0,
            avg_transaction_size: 0.0,
            avg_holding_balance: 0.0,
            days_held: 0.0,
            liquidity_ratio: 0.8,
            cross_chain_transfers: 1_000.0,
            buys_volume: 50_000.0,
            sells_volume: 50_000.0,
            stability_reserve: 1_000_000.0,
        }
    }
}

impl TryFrom<RawParameters> for EpochParameters {
    type Error = EngineError;

    fn try_from(raw: RawParameters) -> Result<Self> {
        let params = Self {
            validator_count: raw.validator_count,
            total_holders: raw.total_holders,
            daily_transactions: raw.daily_transactions,
            current_price: raw.current_price,
            avg_transaction_size: raw.avg_transaction_size,
            avg_holding_balance: raw.avg_holding_balance,
            days_held: raw.days_held,
            liquidity_ratio: raw.liquidity_ratio,
            cross_chain_transfers: raw.cross_chain_transfers,
            buys_volume: raw.buys_volume,
            sells_volume: raw.sells_volume,
            stability_reserve: raw.stability_reserve,
        };
        params.validate()?;
        Ok(params)
    }
}

impl From<EpochParameters> for RawParameters {
    fn from(p: EpochParameters) -> Self {
        Self {
            validator_count: p.validator_count,
            total_holders: p.total_holders,
            daily_transactions: p.daily_transactions,
            current_price: p.current_price,
            avg_transaction_size: p.avg_transaction_size,
            avg_holding_balance: p.avg_holding_balance,
            days_held: p.days_held,
            liquidity_ratio: p.liquidity_ratio,
            cross_chain_transfers: p.cross_chain_transfers,
            buys_volume: p.buys_volume,
            sells_volume: p.sells_volume,
            stability_reserve: p.stability_reserve,
        }
    }
}

/// Builder for [`EpochParameters`]; `build` validates.
#[derive(Debug, Clone)]
pub struct EpochParametersBuilder {
    raw: RawParameters,
}

impl EpochParametersBuilder {
    pub fn validator_count(mut self, v: u64) -> Self { self.raw.validator_count = v; self }
    pub fn total_holders(mut self, v: f64) -> Self { self.raw.total_holders = v; self }
    pub fn daily_transactions(mut self, v: f64) -> Self { self.raw.daily_transactions = v; self }
    pub fn current_price(mut self, v: f64) -> Self { self.raw.current_price = v; self }
    pub fn avg_transaction_size(mut self, v: f64) -> Self { self.raw.avg_transaction_size = v; self }
    pub fn avg_holding_balance(mut self, v: f64) -> Self { self.raw.avg_holding_balance = v; self }
    pub fn days_held(mut self, v: f64) -> Self { self.raw.days_held = v; self }
    pub fn liquidity_ratio(mut self, v: f64) -> Self { self.raw.liquidity_ratio = v; self }
    pub fn cross_chain_transfers(mut self, v: f64) -> Self { self.raw.cross_chain_transfers = v; self }
    pub fn buys_volume(mut self, v: f64) -> Self { self.raw.buys_volume = v; self }
    pub fn sells_volume(mut self, v: f64) -> Self { self.raw.sells_volume = v; self }
    pub fn stability_reserve(mut self, v: f64) -> Self { self.raw.stability_reserve = v; self }

    pub fn build(self) -> Result<EpochParameters> {
        EpochParameters::try_from(self.raw)
    }
}

// ─── Circuit Breakers ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitBreakers {
    pub halt_trading: bool,
    pub emergency_spreads: bool,
    pub needs_rebase: bool,
}

impl CircuitBreakers {
    /// True when any breaker fired this epoch.
    pub fn any(&self) -> bool {
        self.halt_trading || self.emergency_spreads || self.needs_rebase
    }
}

// ─── Equilibrium ────────────────────────────────────────────────────────────

/// Metric that failed its equilibrium threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailingMetric {
    PriceStability,
    LiquidityHealth,
    NetworkUtility,
    Convergence,
}

impl FailingMetric {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PriceStability => "price_stability",
            Self::LiquidityHealth => "liquidity_health",
            Self::NetworkUtility => "network_utility",
            Self::Convergence => "convergence",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquilibriumStatus {
    pub is_equilibrium: bool,
    /// In check order: price stability, liquidity health, network utility, convergence.
    pub failing_metrics: Vec<FailingMetric>,
}

// ─── Epoch Result ───────────────────────────────────────────────────────────

/// Immutable per-epoch output record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochResult {
    pub epoch: u64,

    // Indicators
    pub price_stability_index: f64,
    pub network_utility_score: f64,
    pub liquidity_health_index: f64,
    pub market_pressure: f64,
    pub convergence_rate: f64,
    pub settlement_rate: f64,

    // Economic flows (USDC)
    pub daily_validator_reward_usdc: f64,
    pub daily_holder_cost_usdc: f64,
    pub validator_holder_net_usdc: f64,
    pub transaction_fee_usdc: f64,
    pub dynamic_spread: f64,

    pub circuit_breakers: CircuitBreakers,
    pub equilibrium: EquilibriumStatus,
    /// Logical epoch length in seconds.
    pub epoch_duration: u32,

    // Rolling window diagnostics
    pub market_volatility: f64,
    pub volume_weight: f64,
    pub weighted_pressure: f64,
    pub pressure_trend: f64,

    // Input snapshot
    pub current_price: f64,
    pub liquidity_ratio: f64,
    pub daily_transactions: f64,
    pub total_holders: f64,
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> EpochParametersBuilder {
        EpochParameters::builder(5_000, 1_000_000.0, 1.001)
            .daily_transactions(35_000_000.0)
            .avg_transaction_size(6_000.0)
            .avg_holding_balance(10_000.0)
            .days_held(30.0)
    }

    #[test]
    fn builder_accepts_valid_parameters() {
        let p = base().build().expect("test: valid params");
        assert_eq!(p.validator_count(), 5_000);
        assert_eq!(p.liquidity_ratio(), 0.8);
        assert_eq!(p.stability_reserve(), 1_000_000.0);
    }

    #[test]
    fn zero_validators_rejected() {
        let err = base().validator_count(0).build().unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { name: "validator_count", .. }));
    }

    #[test]
    fn non_positive_price_rejected() {
        assert!(base().current_price(0.0).build().is_err());
        assert!(base().current_price(-1.0).build().is_err());
    }

    #[test]
    fn out_of_range_liquidity_rejected() {
        assert!(base().liquidity_ratio(1.2).build().is_err());
        assert!(base().liquidity_ratio(-0.01).build().is_err());
        assert!(base().liquidity_ratio(0.0).build().is_ok());
    }

    #[test]
    fn zero_holders_rejected() {
        let err = base().total_holders(0.0).build().unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { name: "total_holders", .. }));
    }

    #[test]
    fn deserialization_validates() {
        let bad = r#"{"validator_count": 10, "total_holders": 100, "current_price": 1.0, "liquidity_ratio": 2.0}"#;
        assert!(serde_json::from_str::<EpochParameters>(bad).is_err());

        let good = r#"{"validator_count": 10, "total_holders": 100, "current_price": 1.0}"#;
        let p: EpochParameters = serde_json::from_str(good).expect("test: parse");
        assert_eq!(p.buys_volume(), 50_000.0);
    }

    #[test]
    fn to_builder_round_trips_fields() {
        let p = base().build().expect("test: valid");
        let q = p.to_builder().current_price(0.9).build().expect("test: valid");
        assert_eq!(q.current_price(), 0.9);
        assert_eq!(q.days_held(), p.days_held());
    }

    #[test]
    fn failing_metric_serializes_snake_case() {
        let json = serde_json::to_string(&FailingMetric::PriceStability).expect("test: ser");
        assert_eq!(json, "\"price_stability\"");
        assert_eq!(FailingMetric::Convergence.name(), "convergence");
    }
}
