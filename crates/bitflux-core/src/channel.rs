//! Color plane addressing for interleaved RGBA8 buffers.
//!
//! Pixels are stored interleaved, four bytes per pixel:
//!
//! ```text
//! Memory: [R G B A R G B A R G B A ...]
//!          0 1 2 3 4 5 6 7 8 ...
//! ```
//!
//! Each color channel occupies one byte out of every [`PIXEL_STRIDE`],
//! starting at that channel's fixed offset. The alpha byte (offset 3) is
//! never addressed by a [`Channel`] and is never touched by transforms.

use std::fmt;

/// Number of interleaved bytes per pixel (RGBA).
pub const PIXEL_STRIDE: usize = 4;

/// One color plane of an interleaved RGBA8 pixel buffer.
///
/// The discriminant doubles as the channel's byte offset within a pixel.
/// Channels carry a fixed scheduling priority: red before green before
/// blue.
///
/// # Example
///
/// ```rust
/// use bitflux_core::Channel;
///
/// assert_eq!(Channel::Green.offset(), 1);
/// assert_eq!(Channel::COLOR[0], Channel::Red);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(usize)]
pub enum Channel {
    /// Red plane (byte offset 0). Highest scheduling priority.
    Red = 0,
    /// Green plane (byte offset 1).
    Green = 1,
    /// Blue plane (byte offset 2). Lowest scheduling priority.
    Blue = 2,
}

impl Channel {
    /// All color channels in fixed priority order (red, green, blue).
    pub const COLOR: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Byte offset of this channel within an interleaved pixel.
    #[inline]
    pub const fn offset(self) -> usize {
        self as usize
    }

    /// Zero-based slot index, identical to [`offset`](Self::offset) for
    /// color channels; used to index per-channel state arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lower-case channel name, for logging and thread naming.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_match_interleave_order() {
        assert_eq!(Channel::Red.offset(), 0);
        assert_eq!(Channel::Green.offset(), 1);
        assert_eq!(Channel::Blue.offset(), 2);
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            Channel::COLOR,
            [Channel::Red, Channel::Green, Channel::Blue]
        );
        assert!(Channel::Red < Channel::Green);
        assert!(Channel::Green < Channel::Blue);
    }

    #[test]
    fn test_display() {
        assert_eq!(Channel::Blue.to_string(), "blue");
    }
}
