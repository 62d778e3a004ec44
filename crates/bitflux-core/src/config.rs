//! Per-channel transform configuration.
//!
//! A [`ChannelConfig`] describes the conditional bitwise transform applied
//! to one color channel: a [`Comparator`] predicate against a threshold
//! byte, and on a match, a [`BitOp`] whose second argument is selected by
//! [`Operand`].
//!
//! All three enums are closed and exhaustive, so every one of the
//! 3 x 2 x 4 combinations resolves to a defined per-byte rule; there is no
//! "invalid configuration" error path.
//!
//! # Example
//!
//! ```rust
//! use bitflux_core::{BitOp, ChannelConfig, Comparator, Operand};
//!
//! let cfg = ChannelConfig {
//!     enabled: true,
//!     comparator: Comparator::Equal,
//!     operand: Operand::Own,
//!     operator: BitOp::ExclusiveOr,
//!     threshold: 128,
//! };
//! assert!(cfg.comparator.evaluate(128, cfg.threshold));
//! ```

/// Predicate comparing a byte to the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Comparator {
    /// Transform when `value > threshold`.
    #[default]
    Greater,
    /// Transform when `value == threshold`.
    Equal,
    /// Transform when `value < threshold`.
    Less,
}

impl Comparator {
    /// Evaluates the predicate for `value` against `threshold`.
    #[inline]
    pub fn evaluate(self, value: u8, threshold: u8) -> bool {
        match self {
            Comparator::Greater => value > threshold,
            Comparator::Equal => value == threshold,
            Comparator::Less => value < threshold,
        }
    }
}

/// Selects the second argument of a [`BitOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operand {
    /// The byte's own value.
    Own,
    /// The configured threshold byte.
    #[default]
    Threshold,
}

/// Bitwise operator applied when the comparator predicate holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BitOp {
    /// Bitwise NOT of the byte; the operand selection is unused.
    Complement,
    /// Byte XOR operand.
    #[default]
    ExclusiveOr,
    /// Byte shifted left; shift amount taken modulo 8, high bits truncated.
    LeftShift,
    /// Byte shifted right; shift amount taken modulo 8.
    RightShift,
}

/// Configuration of one color channel's conditional transform.
///
/// One instance exists per color channel. The host sets it before or
/// between passes; the engine reads it once per scheduling pass and never
/// mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelConfig {
    /// Whether this channel participates in the pass. Disabled channels
    /// are skipped for work dispatch but remain transparent links in the
    /// scheduling chain.
    pub enabled: bool,
    /// Predicate deciding, per byte, whether the transform applies.
    pub comparator: Comparator,
    /// Second-argument selection for the operator.
    pub operand: Operand,
    /// Bitwise operator applied on a predicate match.
    pub operator: BitOp,
    /// Threshold byte for the comparator (and operand, when selected).
    pub threshold: u8,
}

impl ChannelConfig {
    /// Creates an enabled configuration with the given rule parts.
    pub fn new(comparator: Comparator, operand: Operand, operator: BitOp, threshold: u8) -> Self {
        Self {
            enabled: true,
            comparator,
            operand,
            operator,
            threshold,
        }
    }

    /// Returns a copy with `enabled` replaced.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparator_evaluate() {
        assert!(Comparator::Greater.evaluate(10, 9));
        assert!(!Comparator::Greater.evaluate(9, 9));
        assert!(Comparator::Equal.evaluate(9, 9));
        assert!(!Comparator::Equal.evaluate(10, 9));
        assert!(Comparator::Less.evaluate(8, 9));
        assert!(!Comparator::Less.evaluate(9, 9));
    }

    #[test]
    fn test_default_is_disabled() {
        let cfg = ChannelConfig::default();
        assert!(!cfg.enabled);
        assert_eq!(cfg.threshold, 0);
    }

    #[test]
    fn test_new_is_enabled() {
        let cfg = ChannelConfig::new(
            Comparator::Less,
            Operand::Own,
            BitOp::Complement,
            64,
        );
        assert!(cfg.enabled);
        assert!(!cfg.with_enabled(false).enabled);
    }
}
