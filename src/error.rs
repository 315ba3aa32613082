// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Gate Stability Simulator - Error Types

/// Errors raised before any epoch computation runs.
///
/// Degenerate-but-valid inputs (empty liquidity pool, zero volume, empty
/// window) never surface here; they resolve to documented fallback values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid parameter `{name}` = {value}: must be {requirement}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        requirement: &'static str,
    },

    #[error("invalid configuration `{name}`: {reason}")]
    InvalidConfig {
        name: &'static str,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Require `value` to be finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidParameter { name, value, requirement: "finite and > 0" })
    }
}

/// Require `value` to be finite and non-negative.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidParameter { name, value, requirement: "finite and >= 0" })
    }
}

/// Require `value` to lie in the closed unit interval.
pub(crate) fn ensure_unit_interval(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::InvalidParameter { name, value, requirement: "within [0, 1]" })
    }
}
