// Seeded Initial-Condition Perturbation
// Multiplicative jitter on a scenario's starting point for Monte Carlo runs

use gate_engine::{EngineError, EpochParameters};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Relative jitter half-widths. A value of 0.05 draws factors from [0.95, 1.05).
#[derive(Debug, Clone, Copy)]
pub struct JitterBounds {
    pub price: f64,
    pub flows: f64,
    pub participation: f64,
    pub liquidity: f64,
}

impl Default for JitterBounds {
    fn default() -> Self {
        Self {
            price: 0.02,
            flows: 0.10,
            participation: 0.05,
            liquidity: 0.05,
        }
    }
}

pub struct Perturbation {
    rng: ChaCha8Rng,
    bounds: JitterBounds,
}

impl Perturbation {
    pub fn new(rng: ChaCha8Rng, bounds: JitterBounds) -> Self {
        Self { rng, bounds }
    }

    /// Jittered copy of `base`. Validator count moves with participation;
    /// liquidity stays inside (0, 1].
    pub fn perturb(&mut self, base: &EpochParameters) -> Result<EpochParameters, EngineError> {
        let b = self.bounds;
        let validators = (base.validator_count() as f64 * self.factor(b.participation)).round().max(1.0) as u64;
        let liquidity = (base.liquidity_ratio() * self.factor(b.liquidity)).clamp(1e-6, 1.0);

        base.to_builder()
            .validator_count(validators)
            .total_holders(base.total_holders() * self.factor(b.participation))
            .daily_transactions(base.daily_transactions() * self.factor(b.participation))
            .current_price(base.current_price() * self.factor(b.price))
            .liquidity_ratio(liquidity)
            .buys_volume(base.buys_volume() * self.factor(b.flows))
            .sells_volume(base.sells_volume() * self.factor(b.flows))
            .cross_chain_transfers(base.cross_chain_transfers() * self.factor(b.flows))
            .build()
    }

    fn factor(&mut self, half_width: f64) -> f64 {
        if half_width <= 0.0 {
            return 1.0;
        }
        self.rng.gen_range((1.0 - half_width)..(1.0 + half_width))
    }
}
