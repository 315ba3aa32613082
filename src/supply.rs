// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gate Stability Simulator - Supply Ledger

//! Rebase accounting for the token supply.
//!
//! A rebase scales supply by `target / price` so that the market value of
//! the float returns to the peg:
//!
//! ```text
//! supply_after = supply_before * (target_price / current_price)
//! ```
//!
//! Supply is tracked in `Decimal` so repeated rebases do not accumulate
//! binary rounding drift.

use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::adapter::{from_decimal, to_decimal};
use crate::error::{EngineError, Result};
use crate::params::PEG;

/// Default reference supply (10M tokens).
pub const DEFAULT_SUPPLY: Decimal = dec!(10000000);

// ---------------------------------------------------------------------------
// RebaseEvent
// ---------------------------------------------------------------------------

/// One applied supply adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebaseEvent {
    pub epoch: u64,
    /// Market price that triggered the rebase.
    pub price: f64,
    pub supply_before: Decimal,
    pub supply_after: Decimal,
    /// `(after - before) / before * 100`.
    pub inflation_pct: f64,
}

// ---------------------------------------------------------------------------
// SupplyLedger
// ---------------------------------------------------------------------------

/// Running token supply plus the history of rebases applied to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplyLedger {
    initial_supply: Decimal,
    supply: Decimal,
    target_price: Decimal,
    events: Vec<RebaseEvent>,
}

impl Default for SupplyLedger {
    fn default() -> Self {
        Self {
            initial_supply: DEFAULT_SUPPLY,
            supply: DEFAULT_SUPPLY,
            target_price: to_decimal(PEG),
            events: Vec::new(),
        }
    }
}

impl SupplyLedger {
    pub fn new(initial_supply: Decimal, target_price: Decimal) -> Result<Self> {
        if initial_supply <= Decimal::ZERO {
            return Err(EngineError::InvalidConfig { name: "initial_supply", reason: "must be > 0" });
        }
        if target_price <= Decimal::ZERO {
            return Err(EngineError::InvalidConfig { name: "target_price", reason: "must be > 0" });
        }
        Ok(Self {
            initial_supply,
            supply: initial_supply,
            target_price,
            events: Vec::new(),
        })
    }

    pub fn supply(&self) -> Decimal {
        self.supply
    }

    pub fn initial_supply(&self) -> Decimal {
        self.initial_supply
    }

    /// Supply in effect after `epoch`, including a rebase applied at it.
    pub fn supply_at(&self, epoch: u64) -> Decimal {
        self.events
            .iter()
            .take_while(|e| e.epoch <= epoch)
            .last()
            .map(|e| e.supply_after)
            .unwrap_or(self.initial_supply)
    }

    pub fn events(&self) -> &[RebaseEvent] {
        &self.events
    }

    /// Rebase toward the target price.
    ///
    /// A price that does not convert to a positive decimal is ignored and
    /// leaves the supply untouched. So is a rebase whose result falls outside
    /// the `Decimal` range.
    pub fn apply_rebase(&mut self, epoch: u64, current_price: f64) -> Option<&RebaseEvent> {
        let price = to_decimal(current_price);
        if price <= Decimal::ZERO {
            return None;
        }
        let before = self.supply;
        let Some(after) = before
            .checked_mul(self.target_price)
            .and_then(|scaled| scaled.checked_div(price))
        else {
            warn!(
                "epoch {}: rebase at price {} overflows supply {}, skipped",
                epoch, current_price, before
            );
            return None;
        };
        self.supply = after;
        self.events.push(RebaseEvent {
            epoch,
            price: current_price,
            supply_before: before,
            supply_after: after,
            inflation_pct: percent_change(before, after),
        });
        self.events.last()
    }

    /// Total supply change since the ledger was opened, in percent.
    pub fn cumulative_inflation_pct(&self) -> f64 {
        percent_change(self.initial_supply, self.supply)
    }
}

fn percent_change(before: Decimal, after: Decimal) -> f64 {
    if before.is_zero() {
        return 0.0;
    }
    (after - before)
        .checked_div(before)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .map(from_decimal)
        .unwrap_or_else(|| (from_decimal(after) / from_decimal(before) - 1.0) * 100.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebase_below_peg_expands_supply() {
        let mut ledger = SupplyLedger::default();
        let event = ledger.apply_rebase(4, 0.5).cloned().expect("test: rebase applied");
        assert_eq!(event.supply_before, dec!(10000000));
        assert_eq!(event.supply_after, dec!(20000000));
        assert_eq!(event.inflation_pct, 100.0);
        assert_eq!(ledger.supply(), dec!(20000000));
    }

    #[test]
    fn rebase_above_peg_contracts_supply() {
        let mut ledger = SupplyLedger::new(dec!(1000), dec!(1)).expect("test: ledger");
        ledger.apply_rebase(0, 1.25);
        assert_eq!(ledger.supply(), dec!(800));
        assert_eq!(ledger.cumulative_inflation_pct(), -20.0);
    }

    #[test]
    fn events_accumulate_in_order() {
        let mut ledger = SupplyLedger::default();
        ledger.apply_rebase(1, 0.5);
        ledger.apply_rebase(7, 2.0);
        let epochs: Vec<u64> = ledger.events().iter().map(|e| e.epoch).collect();
        assert_eq!(epochs, vec![1, 7]);
        assert_eq!(ledger.supply(), DEFAULT_SUPPLY);
        assert_eq!(ledger.cumulative_inflation_pct(), 0.0);
    }

    #[test]
    fn supply_at_replays_history() {
        let mut ledger = SupplyLedger::default();
        ledger.apply_rebase(3, 0.5);
        ledger.apply_rebase(9, 2.0);
        assert_eq!(ledger.supply_at(0), DEFAULT_SUPPLY);
        assert_eq!(ledger.supply_at(3), dec!(20000000));
        assert_eq!(ledger.supply_at(8), dec!(20000000));
        assert_eq!(ledger.supply_at(50), DEFAULT_SUPPLY);
    }

    #[test]
    fn non_positive_price_is_ignored() {
        let mut ledger = SupplyLedger::default();
        assert!(ledger.apply_rebase(0, 0.0).is_none());
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn overflowing_rebase_is_skipped() {
        let mut ledger = SupplyLedger::default();
        // 1e7 / 1e-25 is far past Decimal::MAX
        assert!(ledger.apply_rebase(0, 1e-25).is_none());
        assert!(ledger.events().is_empty());
        assert_eq!(ledger.supply(), DEFAULT_SUPPLY);
    }

    #[test]
    fn repeated_rebases_saturate_instead_of_panicking() {
        let mut ledger = SupplyLedger::default();
        let applied = (0..200).filter(|&epoch| ledger.apply_rebase(epoch, 0.5).is_some()).count();
        // 1e7 * 2^n stays below ~7.9e28 for n <= 72
        assert!((60..200).contains(&applied), "applied {}", applied);
        assert_eq!(ledger.events().len(), applied);
        assert!(ledger.supply() > DEFAULT_SUPPLY);
        assert!(ledger.cumulative_inflation_pct().is_finite());
    }

    #[test]
    fn invalid_ledger_rejected() {
        assert!(SupplyLedger::new(Decimal::ZERO, dec!(1)).is_err());
        assert!(SupplyLedger::new(dec!(10), dec!(0)).is_err());
    }
}
