// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gate Stability Simulator - Indicator Formulas
//
// Stateless stability indices and economic flows. Every function is a pure
// map from its numeric arguments (plus an immutable config) to an f64, so
// identical inputs always produce bit-identical outputs.

use crate::params::{BaseRates, EpochTiming, FormulaWeights, NetworkTargets, SettlementParams, PEG};

/// Validator activity normalizer for the pressure dampening factor.
const VALIDATOR_SCALE: f64 = 1_000.0;
/// Participation denominators never drop below this holder count.
const MIN_PARTICIPATION_BASE: f64 = 1_000.0;
/// Balance unit for the logarithmic holding cost.
const BALANCE_UNIT: f64 = 1_000.0;
/// Size unit for the logarithmic transaction fee.
const TX_SIZE_UNIT: f64 = 10_000.0;
/// Share of network revenue paid to validators.
const VALIDATOR_REVENUE_SHARE: f64 = 0.9;
/// Liquidity ratio floor when inverting liquidity into a fee/spread factor.
const LIQUIDITY_FACTOR_FLOOR: f64 = 0.1;
/// Liquidity ratio floor for the emergency spread.
const EMERGENCY_LIQUIDITY_FLOOR: f64 = 0.01;
/// Numerator of the emergency spread multiplier.
const EMERGENCY_LIQUIDITY_REFERENCE: f64 = 0.2;

// ─── Market Pressure ────────────────────────────────────────────────────────

/// Signed buy/sell pressure in [-1, 1].
///
/// `tanh((net / total) * ln(1 + total / pool) * ln(1 + validators / 1000))`.
/// An empty liquidity pool or zero total volume yields zero pressure.
pub fn market_pressure(buys_volume: f64, sells_volume: f64, liquidity_pool: f64, validator_count: u64) -> f64 {
    if liquidity_pool == 0.0 {
        return 0.0;
    }
    let total_volume = buys_volume + sells_volume;
    if total_volume == 0.0 {
        return 0.0;
    }
    let net_flow = buys_volume - sells_volume;
    let validator_factor = (validator_count as f64 / VALIDATOR_SCALE).ln_1p();
    let raw = (net_flow / total_volume) * (total_volume / liquidity_pool).ln_1p();
    (raw * validator_factor).tanh()
}

// ─── Participation ──────────────────────────────────────────────────────────

/// Validator share of the (floored) holder base. Not clamped.
pub fn validator_participation(validator_count: u64, total_holders: f64) -> f64 {
    validator_count as f64 / total_holders.max(MIN_PARTICIPATION_BASE)
}

/// Daily transactions per (floored) holder. Not clamped.
pub fn holder_participation(daily_transactions: f64, total_holders: f64) -> f64 {
    daily_transactions / total_holders.max(MIN_PARTICIPATION_BASE)
}

// ─── Composite Indices ──────────────────────────────────────────────────────

/// Price-stability index in `[psi_floor, 1]`.
///
/// Blends the inverse peg deviation, inverse pressure magnitude and mean
/// participation; each term is clamped to [0, 1] before weighting.
pub fn price_stability_index(
    price: f64,
    pressure: f64,
    validator_participation: f64,
    holder_participation: f64,
    weights: &FormulaWeights,
) -> f64 {
    let price_term = (1.0 / (1.0 + (PEG - price).abs())).clamp(0.0, 1.0);
    let pressure_term = (1.0 / (1.0 + pressure.abs())).clamp(0.0, 1.0);
    let participation_term =
        (validator_participation.clamp(0.0, 1.0) + holder_participation.clamp(0.0, 1.0)) / 2.0;

    let raw = weights.psi_price * price_term
        + weights.psi_pressure * pressure_term
        + weights.psi_participation * participation_term;
    raw.clamp(weights.psi_floor, 1.0)
}

/// Network-utility score in [0, 1]: volume ratio and cross-chain ratio, each capped at 1.
pub fn network_utility_score(
    daily_volume: f64,
    cross_chain_transfers: f64,
    targets: &NetworkTargets,
    weights: &FormulaWeights,
) -> f64 {
    let volume_score = (daily_volume / targets.daily_volume).min(1.0);
    let transfer_score = (cross_chain_transfers / targets.cross_chain_transfers).min(1.0);
    (weights.nus_volume * volume_score + weights.nus_transfers * transfer_score).clamp(0.0, 1.0)
}

/// Minimum stability pool: `max(fraction * supply, multiple * decay penalties)`.
pub fn stability_reserve_requirement(total_supply: f64, daily_decay_penalties: f64, weights: &FormulaWeights) -> f64 {
    (weights.reserve_supply_fraction * total_supply)
        .max(weights.reserve_penalty_multiple * daily_decay_penalties)
}

/// Liquidity-health index in `[lhi_floor, 1]`.
///
/// `(participants / holders) * (liquidity / target) * (reserve / required)`.
pub fn liquidity_health_index(
    active_participants: f64,
    total_holders: f64,
    liquidity_ratio: f64,
    stability_reserve: f64,
    required_reserve: f64,
    targets: &NetworkTargets,
    weights: &FormulaWeights,
) -> f64 {
    let participation_ratio = active_participants / total_holders.max(1.0);
    let liquidity_factor = liquidity_ratio / targets.liquidity_ratio;
    let reserve_ratio = stability_reserve / required_reserve.max(1.0);
    (participation_ratio * liquidity_factor * reserve_ratio).clamp(weights.lhi_floor, 1.0)
}

// ─── Economic Flows ─────────────────────────────────────────────────────────

/// Daily validator reward: market share plus a PSI-scaled stability bonus.
pub fn validator_reward(daily_transactions: f64, validator_count: u64, psi: f64, rates: &BaseRates) -> f64 {
    let transaction_share = daily_transactions / (validator_count.max(1) as f64);
    let market_reward = transaction_share * rates.validator_reward * VALIDATOR_REVENUE_SHARE;
    market_reward * (1.0 + psi)
}

/// Holding cost with logarithmic balance scaling; rises as stability falls.
pub fn holder_cost(days_held: f64, balance: f64, psi: f64, rates: &BaseRates) -> f64 {
    let balance_factor = (1.0 + balance / BALANCE_UNIT).log2();
    rates.holding_rate * days_held * balance_factor * (1.0 - psi)
}

/// Net cost for a validator who is also a holder.
pub fn validator_holder_net(holder_cost: f64, validator_reward: f64, participation_score: f64) -> f64 {
    holder_cost - validator_reward * participation_score
}

/// Dynamic transaction fee.
///
/// `base * (1 + log2(1 + size/10000)) * (1 / max(0.1, L)) * (2 - PSI)`.
pub fn transaction_fee(transaction_size: f64, liquidity_ratio: f64, psi: f64, rates: &BaseRates) -> f64 {
    let volume_factor = 1.0 + (1.0 + transaction_size / TX_SIZE_UNIT).log2();
    let liquidity_factor = 1.0 / liquidity_ratio.max(LIQUIDITY_FACTOR_FLOOR);
    let stability_factor = 1.0 + (1.0 - psi);
    rates.transaction_fee * volume_factor * liquidity_factor * stability_factor
}

// ─── Spreads ────────────────────────────────────────────────────────────────

/// Normal-conditions spread, widening with volume and thin liquidity.
pub fn dynamic_spread(liquidity_ratio: f64, volume_ratio: f64, rates: &BaseRates) -> f64 {
    let liquidity_factor = 1.0 / liquidity_ratio.max(LIQUIDITY_FACTOR_FLOOR);
    rates.spread * liquidity_factor * (1.0 + (1.0 + volume_ratio).log2())
}

/// Stress spread, capped at `cap` times the base spread.
pub fn emergency_spread(liquidity_ratio: f64, cap: f64, rates: &BaseRates) -> f64 {
    let multiplier = EMERGENCY_LIQUIDITY_REFERENCE / liquidity_ratio.max(EMERGENCY_LIQUIDITY_FLOOR);
    rates.spread * multiplier.min(cap)
}

// ─── Settlement & Convergence ───────────────────────────────────────────────

/// Fraction of submitted transactions that settle, in `[0, base_rate]`.
///
/// The base rate is reduced multiplicatively by validator saturation
/// (quadratic), liquidity shortfall against target and pressure magnitude.
pub fn settlement_rate(
    daily_transactions: f64,
    validator_count: u64,
    liquidity_ratio: f64,
    pressure: f64,
    targets: &NetworkTargets,
    params: &SettlementParams,
) -> f64 {
    let capacity = validator_count as f64 * targets.validator_capacity;
    let saturation = if capacity > 0.0 {
        (daily_transactions / capacity).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let capacity_factor = 1.0 - params.max_capacity_penalty * saturation * saturation;
    let liquidity_factor = (liquidity_ratio / targets.liquidity_ratio).clamp(0.0, 1.0);
    let pressure_factor = 1.0 - params.max_pressure_penalty * pressure.abs().min(1.0);

    (params.base_rate * capacity_factor * liquidity_factor * pressure_factor).clamp(0.0, params.base_rate)
}

/// Expected epochs to reach the peg (time-to-target; larger is slower).
///
/// `|price - target| / ((1 / (1 + |pressure|)) * psi)`. Callers pass a PSI
/// that is already floored, so the denominator is positive; a zero PSI
/// with a non-zero gap yields infinity.
pub fn convergence_rate(current_price: f64, target_price: f64, pressure: f64, psi: f64) -> f64 {
    let pressure_factor = 1.0 / (1.0 + pressure.abs());
    let price_gap = (current_price - target_price).abs();
    let denominator = pressure_factor * psi;
    if denominator > 0.0 {
        price_gap / denominator
    } else if price_gap == 0.0 {
        0.0
    } else {
        f64::INFINITY
    }
}

// ─── Supply & Timing ────────────────────────────────────────────────────────

/// Supply after a rebase that pulls `current_price` to `target_price`.
pub fn rebase_supply(current_supply: f64, current_price: f64, target_price: f64) -> f64 {
    (target_price / current_price) * current_supply
}

/// Percentage change in supply between two observations.
pub fn inflation_rate(supply_before: f64, supply_after: f64) -> f64 {
    if supply_before == 0.0 {
        return 0.0;
    }
    (supply_after - supply_before) / supply_before * 100.0
}

/// Logical epoch length: shorter under load or high volatility.
pub fn epoch_duration(transaction_volume: f64, network_throughput: f64, volatility: f64, timing: &EpochTiming) -> u32 {
    if transaction_volume > network_throughput * timing.load_threshold {
        timing.base_secs.saturating_sub(2).max(timing.min_secs)
    } else if volatility > timing.volatility_threshold {
        timing.base_secs.saturating_sub(1).max(timing.min_secs)
    } else {
        timing.base_secs
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn w() -> FormulaWeights {
        FormulaWeights::default()
    }

    #[test]
    fn balanced_flow_has_zero_pressure() {
        assert_eq!(market_pressure(100.0, 100.0, 1_000.0, 5_000), 0.0);
    }

    #[test]
    fn empty_pool_or_volume_is_zero_pressure() {
        assert_eq!(market_pressure(100.0, 0.0, 0.0, 5_000), 0.0);
        assert_eq!(market_pressure(0.0, 0.0, 1_000.0, 5_000), 0.0);
    }

    #[test]
    fn pressure_sign_follows_flow() {
        assert!(market_pressure(180e9, 60e9, 480_000.0, 4_000) > 0.0);
        assert!(market_pressure(40e9, 160e9, 150_000.0, 2_500) < 0.0);
    }

    #[test]
    fn pressure_saturates_within_unit_range() {
        let p = market_pressure(1e15, 0.0, 1.0, 1_000_000);
        assert!(p <= 1.0 && p > 0.99);
    }

    #[test]
    fn psi_stable_market_value() {
        // price 1.001, no pressure, validators 5000 / 1e6 holders, tx 35e6
        let vp = validator_participation(5_000, 1e6);
        let hp = holder_participation(35e6, 1e6);
        let psi = price_stability_index(1.001, 0.0, vp, hp, &w());
        let expected = 0.4 * (1.0 / 1.001) + 0.3 + 0.3 * ((0.005 + 1.0) / 2.0);
        assert!((psi - expected).abs() < 1e-9, "psi {}", psi);
    }

    #[test]
    fn psi_floor_holds_under_collapse() {
        let psi = price_stability_index(1_000.0, 1.0, 0.0, 0.0, &w());
        assert_eq!(psi, 0.3);
    }

    #[test]
    fn nus_blends_capped_ratios() {
        let t = NetworkTargets::default();
        assert_eq!(network_utility_score(400e9, 5_000.0, &t, &w()), 1.0);
        let nus = network_utility_score(100e9, 1_000.0, &t, &w());
        assert!((nus - (0.6 * 0.5 + 0.4 * 0.5)).abs() < 1e-12);
    }

    #[test]
    fn reserve_requirement_takes_larger_term() {
        assert_eq!(stability_reserve_requirement(10_000_000.0, 50_000.0, &w()), 1_000_000.0);
        assert_eq!(stability_reserve_requirement(100_000.0, 50_000.0, &w()), 100_000.0);
    }

    #[test]
    fn lhi_is_floored_and_capped() {
        let t = NetworkTargets::default();
        let low = liquidity_health_index(5_000.0, 1e6, 0.8, 1e6, 1e6, &t, &w());
        assert_eq!(low, 0.2);
        let high = liquidity_health_index(1e6, 1e6, 0.8, 5e6, 1e6, &t, &w());
        assert_eq!(high, 1.0);
    }

    #[test]
    fn reward_scales_with_psi() {
        let r = BaseRates::default();
        let base = validator_reward(1_000.0, 10, 0.0, &r);
        assert!((base - 100.0 * 0.001 * 0.9).abs() < 1e-12);
        assert!((validator_reward(1_000.0, 10, 1.0, &r) - 2.0 * base).abs() < 1e-12);
    }

    #[test]
    fn holder_cost_vanishes_at_full_stability() {
        let r = BaseRates::default();
        assert_eq!(holder_cost(30.0, 10_000.0, 1.0, &r), 0.0);
        let c = holder_cost(30.0, 1_000.0, 0.5, &r);
        assert!((c - 0.00002 * 30.0 * 1.0 * 0.5).abs() < 1e-15);
    }

    #[test]
    fn fee_uses_liquidity_floor() {
        let r = BaseRates::default();
        assert_eq!(transaction_fee(0.0, 0.0, 1.0, &r), transaction_fee(0.0, 0.1, 1.0, &r));
        assert!((transaction_fee(0.0, 1.0, 1.0, &r) - 0.002).abs() < 1e-15);
    }

    #[test]
    fn emergency_spread_is_capped() {
        let r = BaseRates::default();
        assert!((emergency_spread(0.0, 5.0, &r) - 0.005).abs() < 1e-15);
        assert!((emergency_spread(0.1, 5.0, &r) - 0.002).abs() < 1e-15);
    }

    #[test]
    fn dynamic_spread_neutral_at_full_liquidity_and_zero_volume() {
        let r = BaseRates::default();
        assert!((dynamic_spread(1.0, 0.0, &r) - 0.001).abs() < 1e-15);
    }

    #[test]
    fn settlement_rate_is_base_when_unstressed() {
        let t = NetworkTargets::default();
        let s = SettlementParams::default();
        let rate = settlement_rate(0.0, 100, 0.8, 0.0, &t, &s);
        assert!((rate - 0.999).abs() < 1e-15);
    }

    #[test]
    fn settlement_rate_penalties_are_bounded() {
        let t = NetworkTargets::default();
        let s = SettlementParams::default();
        let rate = settlement_rate(1e12, 1, 0.8, 1.0, &t, &s);
        assert!((rate - 0.999 * 0.9 * 0.95).abs() < 1e-12);
        assert_eq!(settlement_rate(1.0, 1, 0.0, 0.0, &t, &s), 0.0);
    }

    #[test]
    fn convergence_is_zero_at_peg() {
        assert_eq!(convergence_rate(1.0, 1.0, 0.5, 0.8), 0.0);
        let c = convergence_rate(1.1, 1.0, 0.0, 0.5);
        assert!((c - 0.2).abs() < 1e-12);
        assert_eq!(convergence_rate(1.1, 1.0, 0.0, 0.0), f64::INFINITY);
    }

    #[test]
    fn rebase_restores_peg_value() {
        let supply = rebase_supply(1_000_000.0, 0.5, 1.0);
        assert_eq!(supply, 2_000_000.0);
        assert_eq!(inflation_rate(1_000_000.0, supply), 100.0);
        assert_eq!(inflation_rate(0.0, 10.0), 0.0);
    }

    #[test]
    fn epoch_duration_schedule() {
        let t = EpochTiming::default();
        assert_eq!(epoch_duration(900.0, 1_000.0, 0.0, &t), 8);
        assert_eq!(epoch_duration(100.0, 1_000.0, 0.6, &t), 9);
        assert_eq!(epoch_duration(100.0, 1_000.0, 0.1, &t), 10);
    }
}
