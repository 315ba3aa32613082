// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gate Stability Simulator - Economic Configuration

//! Immutable configuration surface for the epoch engine and the driver.
//!
//! Every formula reads its constants from one of these structs, passed by
//! reference. Nothing here is mutated during a run; overrides are applied
//! by building a new value (usually via serde with `#[serde(default)]`).

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

// ---------------------------------------------------------------------------
// BaseRates
// ---------------------------------------------------------------------------

/// Base USDC rates that scale rewards, costs, fees and spreads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseRates {
    /// Reward per transaction share paid to validators.
    pub validator_reward: f64,
    /// Per-day holding rate applied to a holder's balance factor.
    pub holding_rate: f64,
    /// Base transaction fee.
    pub transaction_fee: f64,
    /// Base quoted spread (typically 0.001 USDC).
    pub spread: f64,
}

impl Default for BaseRates {
    fn default() -> Self {
        Self {
            validator_reward: 0.001,
            holding_rate: 0.00002,
            transaction_fee: 0.002,
            spread: 0.001,
        }
    }
}

// ---------------------------------------------------------------------------
// NetworkTargets
// ---------------------------------------------------------------------------

/// Target price of the token. Breakers, convergence, the stabilization
/// policy and the supply ledger all measure against it.
pub const PEG: f64 = 1.0;

/// Network-scale targets the ratios are measured against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkTargets {
    /// Target daily volume ($200B).
    pub daily_volume: f64,
    /// Target cross-chain transfers per epoch.
    pub cross_chain_transfers: f64,
    /// Target liquidity ratio (LHI and settlement normalize against it).
    pub liquidity_ratio: f64,
    /// Reference total supply used for the reserve requirement.
    pub total_supply: f64,
    /// Reference daily decay penalties used for the reserve requirement.
    pub daily_decay_penalties: f64,
    /// Transactions per validator per epoch before saturation.
    pub validator_capacity: f64,
}

impl Default for NetworkTargets {
    fn default() -> Self {
        Self {
            daily_volume: 200_000_000_000.0,
            cross_chain_transfers: 2_000.0,
            liquidity_ratio: 0.8,
            total_supply: 10_000_000.0,
            daily_decay_penalties: 50_000.0,
            validator_capacity: 1_000.0,
        }
    }
}

// ---------------------------------------------------------------------------
// FormulaWeights
// ---------------------------------------------------------------------------

/// Blend weights for the composite indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulaWeights {
    pub psi_price: f64,
    pub psi_pressure: f64,
    pub psi_participation: f64,
    /// PSI never drops below this value.
    pub psi_floor: f64,
    pub nus_volume: f64,
    pub nus_transfers: f64,
    /// LHI never drops below this value.
    pub lhi_floor: f64,
    /// Required reserve as a fraction of total supply.
    pub reserve_supply_fraction: f64,
    /// Required reserve as a multiple of daily decay penalties.
    pub reserve_penalty_multiple: f64,
}

impl Default for FormulaWeights {
    fn default() -> Self {
        Self {
            psi_price: 0.4,
            psi_pressure: 0.3,
            psi_participation: 0.3,
            psi_floor: 0.3,
            nus_volume: 0.6,
            nus_transfers: 0.4,
            lhi_floor: 0.2,
            reserve_supply_fraction: 0.10,
            reserve_penalty_multiple: 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// BreakerThresholds
// ---------------------------------------------------------------------------

/// Circuit-breaker trip points. All comparisons are strict.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakerThresholds {
    /// Liquidity ratio below which trading halts.
    pub min_liquidity: f64,
    /// Liquidity ratio below which emergency spreads apply.
    pub emergency_liquidity: f64,
    /// Absolute peg deviation above which a rebase is required.
    pub max_price_deviation: f64,
    /// LHI below which trading halts.
    pub halt_health: f64,
    /// LHI below which emergency spreads apply.
    pub emergency_health: f64,
    /// Emergency spread multiplier cap (x base spread).
    pub emergency_spread_cap: f64,
}

impl Default for BreakerThresholds {
    fn default() -> Self {
        Self {
            min_liquidity: 0.10,
            emergency_liquidity: 0.15,
            max_price_deviation: 0.30,
            halt_health: 0.2,
            emergency_health: 0.5,
            emergency_spread_cap: 5.0,
        }
    }
}

// ---------------------------------------------------------------------------
// EquilibriumThresholds
// ---------------------------------------------------------------------------

/// Minimums (and the convergence maximum) for the equilibrium check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EquilibriumThresholds {
    pub psi_min: f64,
    pub lhi_min: f64,
    pub nus_min: f64,
    /// Convergence is time-to-target in epochs, so smaller is better.
    pub convergence_max: f64,
}

impl Default for EquilibriumThresholds {
    fn default() -> Self {
        Self {
            psi_min: 0.8,
            lhi_min: 0.7,
            nus_min: 0.6,
            convergence_max: 10.0,
        }
    }
}

// ---------------------------------------------------------------------------
// SettlementParams
// ---------------------------------------------------------------------------

/// Settlement-rate model: base rate reduced by three bounded penalties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementParams {
    pub base_rate: f64,
    /// Maximum reduction from validator saturation (quadratic).
    pub max_capacity_penalty: f64,
    /// Maximum reduction from market pressure magnitude.
    pub max_pressure_penalty: f64,
}

impl Default for SettlementParams {
    fn default() -> Self {
        Self {
            base_rate: 0.999,
            max_capacity_penalty: 0.10,
            max_pressure_penalty: 0.05,
        }
    }
}

// ---------------------------------------------------------------------------
// EpochTiming
// ---------------------------------------------------------------------------

/// Epoch duration schedule in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EpochTiming {
    pub base_secs: u32,
    pub min_secs: u32,
    /// Fraction of throughput above which the network counts as loaded.
    pub load_threshold: f64,
    pub volatility_threshold: f64,
}

impl Default for EpochTiming {
    fn default() -> Self {
        Self {
            base_secs: 10,
            min_secs: 5,
            load_threshold: 0.8,
            volatility_threshold: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// EconomicsConfig
// ---------------------------------------------------------------------------

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicsConfig {
    pub rates: BaseRates,
    pub targets: NetworkTargets,
    pub weights: FormulaWeights,
    pub breakers: BreakerThresholds,
    pub equilibrium: EquilibriumThresholds,
    pub settlement: SettlementParams,
    pub timing: EpochTiming,
    pub window: WindowConfig,
}

/// Rolling market window shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Observations kept per series (oldest evicted first).
    pub size: usize,
    /// Per-step decay for the weighted pressure average.
    pub pressure_decay: f64,
    /// Observations in the "recent" volume mean.
    pub recent_volume_span: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            size: 30,
            pressure_decay: 0.94,
            recent_volume_span: 5,
        }
    }
}

impl EconomicsConfig {
    /// Reject configurations that would turn documented ratios into NaN.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("targets.daily_volume", self.targets.daily_volume),
            ("targets.cross_chain_transfers", self.targets.cross_chain_transfers),
            ("targets.liquidity_ratio", self.targets.liquidity_ratio),
            ("targets.validator_capacity", self.targets.validator_capacity),
            ("settlement.base_rate", self.settlement.base_rate),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(EngineError::InvalidConfig { name, reason: "must be finite and > 0" });
            }
        }

        let non_negative = [
            ("rates.validator_reward", self.rates.validator_reward),
            ("rates.holding_rate", self.rates.holding_rate),
            ("rates.transaction_fee", self.rates.transaction_fee),
            ("rates.spread", self.rates.spread),
            ("targets.total_supply", self.targets.total_supply),
            ("targets.daily_decay_penalties", self.targets.daily_decay_penalties),
            ("breakers.emergency_spread_cap", self.breakers.emergency_spread_cap),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(EngineError::InvalidConfig { name, reason: "must be finite and >= 0" });
            }
        }

        if !(0.0..=1.0).contains(&self.weights.psi_floor) {
            return Err(EngineError::InvalidConfig { name: "weights.psi_floor", reason: "must be within [0, 1]" });
        }
        if !(0.0..=1.0).contains(&self.weights.lhi_floor) {
            return Err(EngineError::InvalidConfig { name: "weights.lhi_floor", reason: "must be within [0, 1]" });
        }
        if !(0.0..=1.0).contains(&self.settlement.max_capacity_penalty)
            || !(0.0..=1.0).contains(&self.settlement.max_pressure_penalty)
        {
            return Err(EngineError::InvalidConfig { name: "settlement", reason: "penalties must be within [0, 1]" });
        }
        if !(self.window.pressure_decay > 0.0 && self.window.pressure_decay <= 1.0) {
            return Err(EngineError::InvalidConfig { name: "window.pressure_decay", reason: "must be within (0, 1]" });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TransitionRules
// ---------------------------------------------------------------------------

/// Heuristic stabilization dynamics applied between epochs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionRules {
    /// Post-rebase price bounds.
    pub rebase_floor: f64,
    pub rebase_ceiling: f64,
    /// No gradual correction inside this deviation band.
    pub drift_dead_band: f64,
    /// Fraction of the peg gap closed per epoch.
    pub drift_rate: f64,
    /// Fraction of the buy/sell imbalance rebalanced per epoch.
    pub volume_rebalance: f64,
    /// Liquidity grows only below this ratio.
    pub liquidity_recovery_below: f64,
    pub liquidity_growth: f64,
    pub liquidity_cap: f64,
    /// PSI at or above this is treated as a stable epoch.
    pub stable_psi: f64,
    pub unstable_tx_factor: f64,
    pub unstable_holder_factor: f64,
    pub stable_tx_factor: f64,
    pub stable_holder_factor: f64,
}

impl Default for TransitionRules {
    fn default() -> Self {
        Self {
            rebase_floor: 0.95,
            rebase_ceiling: 1.05,
            drift_dead_band: 0.01,
            drift_rate: 0.01,
            volume_rebalance: 0.05,
            liquidity_recovery_below: 0.7,
            liquidity_growth: 1.02,
            liquidity_cap: 0.8,
            stable_psi: 0.8,
            unstable_tx_factor: 0.95,
            unstable_holder_factor: 0.99,
            stable_tx_factor: 1.01,
            stable_holder_factor: 1.005,
        }
    }
}

impl TransitionRules {
    /// Reject rules that could drive parameters out of their valid ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.rebase_floor > 0.0 && self.rebase_floor <= self.rebase_ceiling && self.rebase_ceiling.is_finite()) {
            return Err(EngineError::InvalidConfig { name: "rules.rebase_floor", reason: "need 0 < floor <= ceiling" });
        }
        let fractions = [
            ("rules.drift_rate", self.drift_rate),
            ("rules.volume_rebalance", self.volume_rebalance),
            ("rules.liquidity_cap", self.liquidity_cap),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::InvalidConfig { name, reason: "must be within [0, 1]" });
            }
        }
        let factors = [
            ("rules.liquidity_growth", self.liquidity_growth),
            ("rules.unstable_tx_factor", self.unstable_tx_factor),
            ("rules.unstable_holder_factor", self.unstable_holder_factor),
            ("rules.stable_tx_factor", self.stable_tx_factor),
            ("rules.stable_holder_factor", self.stable_holder_factor),
        ];
        for (name, value) in factors {
            if !(value.is_finite() && value > 0.0) {
                return Err(EngineError::InvalidConfig { name, reason: "must be finite and > 0" });
            }
        }
        if !(self.drift_dead_band.is_finite() && self.drift_dead_band >= 0.0) {
            return Err(EngineError::InvalidConfig { name: "rules.drift_dead_band", reason: "must be finite and >= 0" });
        }
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(EconomicsConfig::default().validate().is_ok());
    }

    #[test]
    fn default_thresholds_match_documented_values() {
        let cfg = EconomicsConfig::default();
        assert_eq!(cfg.breakers.min_liquidity, 0.10);
        assert_eq!(cfg.breakers.emergency_liquidity, 0.15);
        assert_eq!(cfg.breakers.max_price_deviation, 0.30);
        assert_eq!(cfg.equilibrium.psi_min, 0.8);
        assert_eq!(cfg.equilibrium.convergence_max, 10.0);
        assert_eq!(cfg.window.size, 30);
    }

    #[test]
    fn zero_target_volume_is_rejected() {
        let mut cfg = EconomicsConfig::default();
        cfg.targets.daily_volume = 0.0;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig { name: "targets.daily_volume", .. }));
    }

    #[test]
    fn partial_json_override_keeps_defaults() {
        let cfg: EconomicsConfig =
            serde_json::from_str(r#"{"breakers": {"min_liquidity": 0.05}}"#).expect("test: parse");
        assert_eq!(cfg.breakers.min_liquidity, 0.05);
        assert_eq!(cfg.breakers.emergency_liquidity, 0.15);
        assert_eq!(cfg.rates.spread, 0.001);
        assert_eq!(cfg.window.size, 30);
    }

    #[test]
    fn default_rules_validate() {
        assert!(TransitionRules::default().validate().is_ok());
    }

    #[test]
    fn inverted_rebase_bounds_are_rejected() {
        let rules = TransitionRules { rebase_floor: 1.1, rebase_ceiling: 0.9, ..TransitionRules::default() };
        assert!(rules.validate().is_err());
        let rules = TransitionRules { drift_rate: 1.5, ..TransitionRules::default() };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn pressure_decay_out_of_range_is_rejected() {
        let mut cfg = EconomicsConfig::default();
        cfg.window.pressure_decay = 1.5;
        assert!(cfg.validate().is_err());
    }
}
