//! # bitflux-core
//!
//! Core types for the bitflux per-channel transform engine.
//!
//! This crate provides the foundational types used by `bitflux-engine`:
//!
//! - [`PixelBuffer`] - Owned interleaved RGBA8 pixel storage
//! - [`ChannelView`], [`ChannelViewMut`] - Byte-strided, non-owning views
//!   exposing one color plane of the buffer
//! - [`Channel`] - Color plane addressing (red, green, blue)
//! - [`ChannelConfig`] - Per-channel transform configuration
//! - [`CoreError`] - Unified error type
//!
//! ## Design Philosophy
//!
//! The buffer is the sole owner of the pixel allocation. Channel views are
//! borrowed descriptors (offset + stride) derived on demand; re-deriving a
//! view is free, and the borrow checker guarantees a view never outlives
//! the allocation it reads:
//!
//! ```rust
//! use bitflux_core::{Channel, PixelBuffer};
//!
//! let mut buf = PixelBuffer::new(4).unwrap();
//! buf.view_mut(Channel::Red).apply(|v| v ^ 0xFF);
//! assert_eq!(buf.view(Channel::Red).get(0), 0xFF);
//! assert_eq!(buf.view(Channel::Green).get(0), 0x00);
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` - Enable rayon-parallel per-byte iteration (enabled by default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod channel;
pub mod config;
pub mod error;

// Re-exports for convenience
pub use buffer::{ChannelView, ChannelViewMut, PixelBuffer};
pub use channel::{Channel, PIXEL_STRIDE};
pub use config::{BitOp, ChannelConfig, Comparator, Operand};
pub use error::{CoreError, CoreResult};
