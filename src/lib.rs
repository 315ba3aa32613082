// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gate Stability Simulator

//! Agent-free epoch economics for a pegged settlement token.
//!
//! [`EpochEngine::run_epoch`] maps one epoch's [`EpochParameters`] plus the
//! rolling [`MarketWindowState`] to an [`EpochResult`]. [`SimulationRun`]
//! feeds each result back through a [`TransitionPolicy`] to produce the
//! next epoch's parameters.

pub mod error;
pub mod types;
pub mod params;
pub mod market_window;
pub mod formulas;
pub mod circuit_breaker;
pub mod engine;
pub mod simulation;
pub mod supply;
pub mod adapter;

pub use engine::{run_epoch, EpochEngine};
pub use error::EngineError;
pub use market_window::MarketWindowState;
pub use params::{EconomicsConfig, TransitionRules};
pub use simulation::{run_simulation, SimulationRun, StabilizationPolicy, TransitionPolicy};
#[cfg(not(target_arch = "wasm32"))]
pub use simulation::run_parallel;
pub use supply::{RebaseEvent, SupplyLedger};
pub use types::*;

use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

/// Stepwise simulation handle for JavaScript hosts.
///
/// Hosts cancel simply by not calling `step` again; epochs are never
/// interrupted midway.
#[wasm_bindgen]
pub struct GateSimulation {
    run: SimulationRun,
}

#[wasm_bindgen]
impl GateSimulation {
    /// Build from a parameter object shaped like [`RawParameters`].
    #[wasm_bindgen(constructor)]
    pub fn new(params: JsValue) -> Result<GateSimulation, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let initial: EpochParameters = serde_wasm_bindgen::from_value(params)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { run: SimulationRun::new(initial) })
    }

    /// Run one epoch and return its result.
    pub fn step(&mut self) -> Result<JsValue, JsValue> {
        let result = self.run.step().map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(result).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Run N epochs without returning results (fast batch mode).
    pub fn run_batch(&mut self, epochs: u32) -> Result<(), JsValue> {
        self.run.run(epochs as u64).map_err(to_js_error)?;
        Ok(())
    }

    /// Full result history so far.
    pub fn results(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.run.results()).unwrap_or(JsValue::NULL)
    }

    /// Parameters the next epoch will use.
    pub fn current_params(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.run.params()).unwrap_or(JsValue::NULL)
    }

    pub fn epoch_count(&self) -> u32 {
        self.run.results().len() as u32
    }

    /// Reset simulation to initial state
    pub fn reset(&mut self) {
        self.run.reset();
    }
}

fn to_js_error(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
