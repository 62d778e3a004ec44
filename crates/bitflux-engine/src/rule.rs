//! Combinatorial transform dispatch.
//!
//! A channel configuration spans 3 comparators x 2 operands x 4 operators.
//! Re-matching on those enums for every byte would put 24-way branching in
//! the hot loop, so the combination is resolved ONCE per configuration
//! change into a [`ByteRule`]: a predicate function pointer, a kernel
//! function pointer, and the captured threshold. Applying the rule to a
//! byte is then two indirect calls with no enum inspection.
//!
//! # Rule semantics
//!
//! For byte `v` and threshold `t`:
//!
//! 1. Evaluate the comparator predicate (`v > t`, `v == t`, or `v < t`).
//! 2. If false, `v` is unchanged.
//! 3. If true, apply the operator with the selected operand:
//!    - `Complement`: `!v` (operand unused)
//!    - `ExclusiveOr`: `v ^ v` (own) or `v ^ t` (threshold)
//!    - `LeftShift` / `RightShift`: shift by `t % 8`, see below
//!
//! Shift operators take their amount from the threshold under BOTH operand
//! settings. That wiring matches the reference behavior this engine
//! reproduces; it is deliberately a single auditable match arm below.
//!
//! # Example
//!
//! ```rust
//! use bitflux_core::{BitOp, ChannelConfig, Comparator, Operand};
//! use bitflux_engine::ByteRule;
//!
//! let cfg = ChannelConfig::new(Comparator::Greater, Operand::Threshold, BitOp::LeftShift, 2);
//! let rule = ByteRule::resolve(&cfg);
//! assert_eq!(rule.apply(9), 36); // 9 > 2, so 9 << 2
//! assert_eq!(rule.apply(1), 1); // 1 > 2 fails, identity
//! ```

use bitflux_core::{BitOp, ChannelConfig, Comparator, Operand};

/// Comparator predicate, resolved to a function pointer.
type Predicate = fn(u8, u8) -> bool;

/// Transform kernel `(value, threshold) -> value'`, resolved to a
/// function pointer.
type Kernel = fn(u8, u8) -> u8;

/// A fully resolved per-byte transform rule.
///
/// Cheap to copy (two function pointers and a byte); safe to send to
/// worker threads.
#[derive(Debug, Clone, Copy)]
pub struct ByteRule {
    predicate: Predicate,
    kernel: Kernel,
    threshold: u8,
}

impl ByteRule {
    /// Resolves a channel configuration into its per-byte rule.
    ///
    /// Called once per scheduling pass per enabled channel, never per byte.
    pub fn resolve(config: &ChannelConfig) -> Self {
        let predicate: Predicate = match config.comparator {
            Comparator::Greater => pred_greater,
            Comparator::Equal => pred_equal,
            Comparator::Less => pred_less,
        };

        let kernel: Kernel = match (config.operator, config.operand) {
            (BitOp::Complement, _) => kernel_complement,
            (BitOp::ExclusiveOr, Operand::Own) => kernel_xor_own,
            (BitOp::ExclusiveOr, Operand::Threshold) => kernel_xor_threshold,
            // Shift amount always comes from the threshold, for both
            // operand settings (reference wiring).
            (BitOp::LeftShift, _) => kernel_shift_left,
            (BitOp::RightShift, _) => kernel_shift_right,
        };

        Self {
            predicate,
            kernel,
            threshold: config.threshold,
        }
    }

    /// Applies the rule to one byte.
    #[inline]
    pub fn apply(self, value: u8) -> u8 {
        if (self.predicate)(value, self.threshold) {
            (self.kernel)(value, self.threshold)
        } else {
            value
        }
    }

    /// The threshold captured from the configuration.
    #[inline]
    pub fn threshold(&self) -> u8 {
        self.threshold
    }
}

fn pred_greater(v: u8, t: u8) -> bool {
    v > t
}

fn pred_equal(v: u8, t: u8) -> bool {
    v == t
}

fn pred_less(v: u8, t: u8) -> bool {
    v < t
}

fn kernel_complement(v: u8, _t: u8) -> u8 {
    !v
}

fn kernel_xor_own(v: u8, _t: u8) -> u8 {
    v ^ v
}

fn kernel_xor_threshold(v: u8, t: u8) -> u8 {
    v ^ t
}

fn kernel_shift_left(v: u8, t: u8) -> u8 {
    v << (t % 8)
}

fn kernel_shift_right(v: u8, t: u8) -> u8 {
    v >> (t % 8)
}
