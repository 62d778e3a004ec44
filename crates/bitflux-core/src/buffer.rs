//! Interleaved pixel storage and strided channel views.
//!
//! This module provides the owned buffer and its borrowed views:
//! - [`PixelBuffer`] - Owned, contiguous RGBA8 storage
//! - [`ChannelView`] - Immutable strided view over one color plane
//! - [`ChannelViewMut`] - Mutable strided view over one color plane
//!
//! # Memory Layout
//!
//! One allocation holds every pixel, four bytes per pixel:
//!
//! ```text
//! Memory: [R G B A R G B A R G B A ...]
//! Red:     ^       ^       ^            offset 0, stride 4
//! Green:     ^       ^       ^          offset 1, stride 4
//! Blue:        ^       ^       ^        offset 2, stride 4
//! ```
//!
//! The three color views are pairwise disjoint in byte position: writing
//! through one view cannot touch a byte visible through another. Views are
//! derived on demand and never stored; re-deriving after the backing
//! storage is replaced is the caller's responsibility and is free.
//!
//! # Usage
//!
//! ```rust
//! use bitflux_core::{Channel, PixelBuffer};
//!
//! let mut buf = PixelBuffer::new(2).unwrap();
//! buf.write_from(&[10, 20, 30, 255, 40, 50, 60, 255]).unwrap();
//!
//! let red = buf.view(Channel::Red);
//! assert_eq!(red.to_vec(), vec![10, 40]);
//!
//! buf.view_mut(Channel::Green).apply(|v| !v);
//! assert_eq!(buf.view(Channel::Green).to_vec(), vec![235, 205]);
//! ```
//!
//! # Dependencies
//!
//! - [`crate::channel::Channel`] - Plane addressing
//! - [`crate::error::CoreError`] - Error types
//! - [`rayon`] - Parallel per-byte iteration (optional)

use crate::{Channel, CoreError, CoreResult, PIXEL_STRIDE};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Owned, contiguous interleaved RGBA8 pixel storage.
///
/// The buffer is the sole owner of the allocation; all channel views
/// borrow from it. Its length is fixed between (re)initializations, and
/// [`reinitialize`](Self::reinitialize) is the only operation permitted to
/// change the pixel count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Interleaved pixel bytes, `pixel_count * PIXEL_STRIDE` long.
    data: Vec<u8>,
    /// Number of pixels.
    pixel_count: usize,
}

impl PixelBuffer {
    /// Allocates zeroed storage for `pixel_count` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AllocationFailed`] if the byte count overflows
    /// or the allocation is refused.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bitflux_core::PixelBuffer;
    ///
    /// let buf = PixelBuffer::new(1920 * 1080).unwrap();
    /// assert_eq!(buf.pixel_count(), 1920 * 1080);
    /// assert_eq!(buf.len_bytes(), 1920 * 1080 * 4);
    /// ```
    pub fn new(pixel_count: usize) -> CoreResult<Self> {
        let bytes = pixel_count
            .checked_mul(PIXEL_STRIDE)
            .ok_or_else(|| CoreError::allocation_failed(usize::MAX, "byte count overflow"))?;
        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|e| CoreError::allocation_failed(bytes, e.to_string()))?;
        data.resize(bytes, 0);
        Ok(Self { data, pixel_count })
    }

    /// Creates a buffer from existing interleaved pixel bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SizeMismatch`] if `data` is not a whole number
    /// of pixels; the error's `expected` is the largest whole-pixel byte
    /// length not exceeding the input.
    pub fn from_bytes(data: Vec<u8>) -> CoreResult<Self> {
        if data.len() % PIXEL_STRIDE != 0 {
            return Err(CoreError::size_mismatch(
                data.len() - data.len() % PIXEL_STRIDE,
                data.len(),
            ));
        }
        let pixel_count = data.len() / PIXEL_STRIDE;
        Ok(Self { data, pixel_count })
    }

    /// Returns the number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// Returns the total byte length of the backing storage.
    #[inline]
    pub fn len_bytes(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixel_count == 0
    }

    /// Zero-copy read-only access to the interleaved bytes.
    ///
    /// Valid until the next mutation or reinitialization.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Bulk-copies `src` into the backing storage.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SizeMismatch`] if lengths differ. No partial
    /// copy is performed; the buffer is left unmodified on error.
    pub fn write_from(&mut self, src: &[u8]) -> CoreResult<()> {
        if src.len() != self.data.len() {
            return Err(CoreError::size_mismatch(self.data.len(), src.len()));
        }
        self.data.copy_from_slice(src);
        Ok(())
    }

    /// Bulk-copies the buffer contents into `dst`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SizeMismatch`] if lengths differ; `dst` is left
    /// unmodified on error.
    pub fn read_into(&self, dst: &mut [u8]) -> CoreResult<()> {
        if dst.len() != self.data.len() {
            return Err(CoreError::size_mismatch(self.data.len(), dst.len()));
        }
        dst.copy_from_slice(&self.data);
        Ok(())
    }

    /// Fills every pixel with the same RGBA value.
    pub fn fill(&mut self, rgba: [u8; PIXEL_STRIDE]) {
        for px in self.data.chunks_exact_mut(PIXEL_STRIDE) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Discards the current allocation and allocates anew for
    /// `new_pixel_count` zeroed pixels.
    ///
    /// This is the only operation permitted to change the pixel count.
    /// Outstanding borrows of views or bytes cannot exist across this call
    /// (enforced by `&mut self`); joining in-flight work first is the
    /// engine's responsibility.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AllocationFailed`] on exhaustion; the prior
    /// buffer remains valid in that case.
    pub fn reinitialize(&mut self, new_pixel_count: usize) -> CoreResult<()> {
        let replacement = Self::new(new_pixel_count)?;
        *self = replacement;
        Ok(())
    }

    /// Derives an immutable strided view over one color channel.
    #[inline]
    pub fn view(&self, channel: Channel) -> ChannelView<'_> {
        ChannelView {
            bytes: &self.data,
            offset: channel.offset(),
        }
    }

    /// Derives a mutable strided view over one color channel.
    ///
    /// Exclusivity of `&mut self` guarantees no other view is live while
    /// this one exists; disjointness across channels is structural (fixed
    /// offset, stride 4).
    #[inline]
    pub fn view_mut(&mut self, channel: Channel) -> ChannelViewMut<'_> {
        ChannelViewMut {
            bytes: &mut self.data,
            offset: channel.offset(),
        }
    }
}

/// Immutable byte-strided view over one color plane.
///
/// Selects one byte out of every [`PIXEL_STRIDE`], starting at the
/// channel's fixed offset.
#[derive(Debug, Clone, Copy)]
pub struct ChannelView<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl ChannelView<'_> {
    /// Number of bytes visible through the view (one per pixel).
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len() / PIXEL_STRIDE
    }

    /// Returns `true` if the view covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the channel byte of pixel `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        self.bytes[index * PIXEL_STRIDE + self.offset]
    }

    /// Iterates over the channel bytes in pixel order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        let offset = self.offset;
        self.bytes.chunks_exact(PIXEL_STRIDE).map(move |px| px[offset])
    }

    /// Copies the channel bytes out into a new vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.iter().collect()
    }
}

/// Mutable byte-strided view over one color plane.
pub struct ChannelViewMut<'a> {
    bytes: &'a mut [u8],
    offset: usize,
}

impl ChannelViewMut<'_> {
    /// Number of bytes visible through the view (one per pixel).
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len() / PIXEL_STRIDE
    }

    /// Returns `true` if the view covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the channel byte of pixel `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        self.bytes[index * PIXEL_STRIDE + self.offset]
    }

    /// Sets the channel byte of pixel `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn set(&mut self, index: usize, value: u8) {
        self.bytes[index * PIXEL_STRIDE + self.offset] = value;
    }

    /// Rewrites every byte in the view with `f(byte)`.
    ///
    /// Bytes are independent; with the `parallel` feature the work is
    /// spread over rayon workers in pixel-group chunks, otherwise it runs
    /// serially. No ordering among bytes is observable either way.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bitflux_core::{Channel, PixelBuffer};
    ///
    /// let mut buf = PixelBuffer::new(3).unwrap();
    /// buf.view_mut(Channel::Blue).apply(|v| v ^ 0x0F);
    /// assert_eq!(buf.view(Channel::Blue).to_vec(), vec![0x0F; 3]);
    /// ```
    pub fn apply<F>(&mut self, f: F)
    where
        F: Fn(u8) -> u8 + Sync,
    {
        let offset = self.offset;

        #[cfg(feature = "parallel")]
        self.bytes.par_chunks_mut(PIXEL_STRIDE).for_each(|px| {
            px[offset] = f(px[offset]);
        });

        #[cfg(not(feature = "parallel"))]
        for px in self.bytes.chunks_exact_mut(PIXEL_STRIDE) {
            px[offset] = f(px[offset]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_buffer() -> PixelBuffer {
        PixelBuffer::from_bytes(vec![
            10, 20, 30, 255, //
            40, 50, 60, 254, //
            70, 80, 90, 253, //
        ])
        .unwrap()
    }

    #[test]
    fn test_new_zeroed() {
        let buf = PixelBuffer::new(5).unwrap();
        assert_eq!(buf.pixel_count(), 5);
        assert_eq!(buf.len_bytes(), 20);
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_new_overflow_fails() {
        let err = PixelBuffer::new(usize::MAX).unwrap_err();
        assert!(err.is_allocation_error());
    }

    #[test]
    fn test_from_bytes_rejects_ragged_length() {
        let err = PixelBuffer::from_bytes(vec![0; 7]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::SizeMismatch {
                expected: 4,
                got: 7
            }
        ));
    }

    #[test]
    fn test_view_strides() {
        let buf = sample_buffer();
        assert_eq!(buf.view(Channel::Red).to_vec(), vec![10, 40, 70]);
        assert_eq!(buf.view(Channel::Green).to_vec(), vec![20, 50, 80]);
        assert_eq!(buf.view(Channel::Blue).to_vec(), vec![30, 60, 90]);
        assert_eq!(buf.view(Channel::Blue).get(1), 60);
        assert_eq!(buf.view(Channel::Red).len(), 3);
    }

    #[test]
    fn test_empty_buffer_views() {
        let buf = PixelBuffer::new(0).unwrap();
        assert!(buf.is_empty());
        for ch in Channel::COLOR {
            let view = buf.view(ch);
            assert!(view.is_empty());
            assert_eq!(view.len(), 0);
            assert_eq!(view.iter().count(), 0);
            assert_eq!(view.to_vec(), Vec::<u8>::new());
        }
    }

    #[test]
    fn test_view_mut_is_disjoint() {
        let mut buf = sample_buffer();
        let before = buf.as_bytes().to_vec();
        buf.view_mut(Channel::Green).apply(|v| !v);

        for (i, (&was, &now)) in before.iter().zip(buf.as_bytes()).enumerate() {
            if i % PIXEL_STRIDE == Channel::Green.offset() {
                assert_eq!(now, !was);
            } else {
                assert_eq!(now, was, "byte {i} outside green was touched");
            }
        }
    }

    #[test]
    fn test_write_from_size_mismatch_keeps_contents() {
        let mut buf = sample_buffer();
        let before = buf.as_bytes().to_vec();
        let err = buf.write_from(&[0; 8]).unwrap_err();
        assert!(err.is_size_mismatch());
        assert_eq!(buf.as_bytes(), &before[..]);
    }

    #[test]
    fn test_read_into_roundtrip() {
        let buf = sample_buffer();
        let mut out = vec![0u8; buf.len_bytes()];
        buf.read_into(&mut out).unwrap();
        assert_eq!(out, buf.as_bytes());

        let mut short = vec![0u8; 4];
        assert!(buf.read_into(&mut short).unwrap_err().is_size_mismatch());
    }

    #[test]
    fn test_reinitialize_changes_count_and_zeroes() {
        let mut buf = sample_buffer();
        buf.reinitialize(2).unwrap();
        assert_eq!(buf.pixel_count(), 2);
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fill() {
        let mut buf = PixelBuffer::new(2).unwrap();
        buf.fill([1, 2, 3, 4]);
        assert_eq!(buf.as_bytes(), &[1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn test_set_get() {
        let mut buf = PixelBuffer::new(2).unwrap();
        let mut view = buf.view_mut(Channel::Red);
        view.set(1, 42);
        assert_eq!(view.get(1), 42);
        assert_eq!(buf.as_bytes()[4], 42);
    }
}
