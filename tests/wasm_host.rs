//! Host-facing wrapper checks. Run with `wasm-pack test --node`.
#![cfg(target_arch = "wasm32")]

use gate_engine::{EpochParameters, EpochResult, GateSimulation, RawParameters};
use wasm_bindgen_test::*;

fn crisis_params() -> wasm_bindgen::JsValue {
    let params = EpochParameters::builder(5_000, 1_000_000.0, 0.55)
        .daily_transactions(35_000_000.0)
        .liquidity_ratio(0.05)
        .build()
        .unwrap();
    serde_wasm_bindgen::to_value(&params).unwrap()
}

#[wasm_bindgen_test]
fn step_returns_epoch_result() {
    let mut sim = GateSimulation::new(crisis_params()).unwrap();
    let first: EpochResult = serde_wasm_bindgen::from_value(sim.step().unwrap()).unwrap();
    assert_eq!(first.epoch, 0);
    assert!(first.circuit_breakers.halt_trading);
    assert!(first.circuit_breakers.needs_rebase);
}

#[wasm_bindgen_test]
fn batch_then_reset() {
    let mut sim = GateSimulation::new(crisis_params()).unwrap();
    sim.run_batch(25).unwrap();
    assert_eq!(sim.epoch_count(), 25);
    let results: Vec<EpochResult> = serde_wasm_bindgen::from_value(sim.results()).unwrap();
    assert_eq!(results.len(), 25);
    sim.reset();
    assert_eq!(sim.epoch_count(), 0);
}

#[wasm_bindgen_test]
fn invalid_params_are_rejected() {
    let raw = RawParameters { validator_count: 0, total_holders: 10.0, ..RawParameters::default() };
    let bad = serde_wasm_bindgen::to_value(&raw).unwrap();
    assert!(GateSimulation::new(bad).is_err());
}
