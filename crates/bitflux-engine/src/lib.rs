//! # bitflux-engine
//!
//! Conditional bitwise transform dispatch over interleaved RGBA8 buffers.
//!
//! Each color channel carries an independent
//! [`ChannelConfig`](bitflux_core::ChannelConfig): a comparator predicate
//! against a threshold byte and, on a match, a bitwise operator. The engine
//! resolves each configuration once into a [`ByteRule`], then dispatches one
//! parallel-over-bytes unit of work per enabled channel, serialized across
//! channels by a red -> green -> blue completion chain.
//!
//! # Modules
//!
//! - [`rule`] - Combinatorial dispatch: (comparator, operand, operator)
//!   resolved to a per-byte rule
//! - [`chain`] - Completion tokens and the cross-channel dependency chain
//! - [`engine`] - Pass orchestration, completion, and readback
//!
//! # Example
//!
//! ```rust
//! use bitflux_core::{BitOp, Channel, ChannelConfig, Comparator, Operand};
//! use bitflux_engine::Engine;
//!
//! let mut engine = Engine::new(4).unwrap();
//! engine.update_input(&[128, 0, 0, 255, 5, 0, 0, 255, 200, 0, 0, 255, 128, 0, 0, 255]).unwrap();
//! engine.set_config(
//!     Channel::Red,
//!     ChannelConfig::new(Comparator::Equal, Operand::Own, BitOp::ExclusiveOr, 128),
//! );
//!
//! engine.run_pass();
//! engine.complete_all();
//!
//! let out = engine.output();
//! assert_eq!([out[0], out[4], out[8], out[12]], [0, 5, 200, 0]);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod chain;
pub mod engine;
pub mod rule;

pub use chain::{DependencyChain, DispatchHandle, SENTINEL_TICKET};
pub use engine::{Engine, OutputRef};
pub use rule::ByteRule;

// Error types are shared with the core crate.
pub use bitflux_core::{CoreError, CoreResult};
