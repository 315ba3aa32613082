// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gate Stability Simulator - Rolling Market Window

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::params::WindowConfig;

// ---------------------------------------------------------------------------
// MarketWindowState - bounded price / volume / pressure history
// ---------------------------------------------------------------------------

/// Rolling history owned by exactly one simulation run.
///
/// All three series share one capacity and are appended together, so they
/// always have the same length. A capacity of zero keeps nothing and every
/// derived value falls back to its empty-window default.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MarketWindowState {
    capacity: usize,
    pressure_decay: f64,
    recent_volume_span: usize,
    prices: VecDeque<f64>,
    volumes: VecDeque<f64>,
    pressures: VecDeque<f64>,
}

impl Default for MarketWindowState {
    fn default() -> Self {
        Self::from_config(&WindowConfig::default())
    }
}

impl MarketWindowState {
    /// Window with the default decay (0.94) and recent span (5).
    pub fn new(capacity: usize) -> Self {
        Self::from_config(&WindowConfig { size: capacity, ..WindowConfig::default() })
    }

    pub fn from_config(cfg: &WindowConfig) -> Self {
        Self {
            capacity: cfg.size,
            pressure_decay: cfg.pressure_decay,
            recent_volume_span: cfg.recent_volume_span,
            prices: VecDeque::with_capacity(cfg.size),
            volumes: VecDeque::with_capacity(cfg.size),
            pressures: VecDeque::with_capacity(cfg.size),
        }
    }

    /// Append one observation to each series, evicting the oldest at capacity.
    pub fn update(&mut self, price: f64, volume: f64, pressure: f64) {
        push_and_trim(&mut self.prices, price, self.capacity);
        push_and_trim(&mut self.volumes, volume, self.capacity);
        push_and_trim(&mut self.pressures, pressure, self.capacity);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.prices.iter().copied()
    }

    pub fn volumes(&self) -> impl Iterator<Item = f64> + '_ {
        self.volumes.iter().copied()
    }

    pub fn pressures(&self) -> impl Iterator<Item = f64> + '_ {
        self.pressures.iter().copied()
    }

    /// Population std-dev of log returns, scaled by `sqrt(capacity)`.
    ///
    /// Zero with fewer than two prices.
    pub fn volatility(&self) -> f64 {
        if self.prices.len() < 2 {
            return 0.0;
        }
        let returns: Vec<f64> = self
            .prices
            .iter()
            .zip(self.prices.iter().skip(1))
            .map(|(prev, next)| (next / prev).ln())
            .collect();
        population_std_dev(&returns) * (self.capacity as f64).sqrt()
    }

    /// Recent-volume mean over whole-window mean, capped at 1.
    ///
    /// Returns 1 for an empty window or when the whole-window mean is zero.
    pub fn volume_weight(&self) -> f64 {
        if self.volumes.is_empty() {
            return 1.0;
        }
        let total_mean = mean(self.volumes.iter().copied());
        if total_mean <= 0.0 {
            return 1.0;
        }
        let span = self.recent_volume_span.min(self.volumes.len());
        let recent_mean = mean(self.volumes.iter().skip(self.volumes.len() - span).copied());
        (recent_mean / total_mean).min(1.0)
    }

    /// Exponentially decayed average of pressure, newest weighted 1.
    ///
    /// Returns 0 for an empty window.
    pub fn weighted_pressure(&self) -> f64 {
        let mut weight = 1.0;
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for p in self.pressures.iter().rev() {
            weighted_sum += weight * p;
            weight_total += weight;
            weight *= self.pressure_decay;
        }
        if weight_total > 0.0 {
            weighted_sum / weight_total
        } else {
            0.0
        }
    }

    /// Average per-epoch change in pressure across the window.
    pub fn pressure_trend(&self) -> f64 {
        match (self.pressures.front(), self.pressures.back()) {
            (Some(first), Some(last)) if self.pressures.len() >= 2 => {
                (last - first) / (self.pressures.len() - 1) as f64
            }
            _ => 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn push_and_trim(window: &mut VecDeque<f64>, value: f64, capacity: usize) {
    if capacity == 0 {
        return;
    }
    if window.len() == capacity {
        window.pop_front();
    }
    window.push_back(value);
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values.iter().copied());
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
