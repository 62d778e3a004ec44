//! Pass orchestration, completion, and readback.
//!
//! The [`Engine`] owns the pixel buffer (behind a mutex shared with
//! workers), the three channel configurations, and the dependency chain.
//! Each [`run_pass`](Engine::run_pass) walks the channels in priority
//! order: enabled channels get a resolved [`ByteRule`], a predecessor
//! handle from the chain, and a spawned worker; disabled channels only
//! advance their chain slot per the fan-through rule.
//!
//! A worker waits for its predecessor, locks the buffer, applies its rule
//! to every byte of its channel view (rayon-parallel over pixel groups),
//! then signals its handle. The red -> green -> blue chain keeps the
//! buffer lock uncontended in steady state; it exists for deterministic
//! cross-channel ordering, not data dependence - the channel byte ranges
//! are disjoint.
//!
//! Readback (`output`, `output_copy`) and whole-buffer mutation
//! (`update_input`, `reinitialize`) implicitly join all outstanding work
//! first, so observed state is always post-transform-consistent.

use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, trace, warn};

use bitflux_core::{Channel, ChannelConfig, CoreResult, PixelBuffer};

use crate::chain::DependencyChain;
use crate::rule::ByteRule;

/// Transform engine over one interleaved RGBA8 pixel buffer.
///
/// # Example
///
/// ```rust
/// use bitflux_core::{BitOp, Channel, ChannelConfig, Comparator, Operand};
/// use bitflux_engine::Engine;
///
/// let mut engine = Engine::new(2).unwrap();
/// engine.update_input(&[9, 0, 0, 255, 1, 0, 0, 255]).unwrap();
/// engine.set_config(
///     Channel::Red,
///     ChannelConfig::new(Comparator::Greater, Operand::Threshold, BitOp::LeftShift, 2),
/// );
///
/// engine.run_pass();
/// let out = engine.output();
/// assert_eq!(out[0], 36); // 9 > 2, so 9 << 2
/// assert_eq!(out[4], 1); // 1 > 2 fails
/// ```
pub struct Engine {
    buffer: Arc<Mutex<PixelBuffer>>,
    configs: [ChannelConfig; 3],
    chain: DependencyChain,
    workers: Vec<JoinHandle<()>>,
    pixel_count: usize,
}

impl Engine {
    /// Creates an engine with a zeroed buffer of `pixel_count` pixels and
    /// all channels disabled.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AllocationFailed`](bitflux_core::CoreError) on
    /// resource exhaustion.
    pub fn new(pixel_count: usize) -> CoreResult<Self> {
        Self::with_configs(pixel_count, [ChannelConfig::default(); 3])
    }

    /// Creates an engine with the given per-channel configurations.
    pub fn with_configs(pixel_count: usize, configs: [ChannelConfig; 3]) -> CoreResult<Self> {
        let buffer = PixelBuffer::new(pixel_count)?;
        debug!(pixel_count, "engine initialized");
        Ok(Self {
            buffer: Arc::new(Mutex::new(buffer)),
            configs,
            chain: DependencyChain::new(),
            workers: Vec::with_capacity(3),
            pixel_count,
        })
    }

    /// Number of pixels in the buffer.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// The configuration of `channel`.
    #[inline]
    pub fn config(&self, channel: Channel) -> &ChannelConfig {
        &self.configs[channel.index()]
    }

    /// Mutable access to the configuration of `channel`.
    ///
    /// Takes effect on the next pass; a running pass keeps the
    /// configuration it was scheduled with.
    #[inline]
    pub fn config_mut(&mut self, channel: Channel) -> &mut ChannelConfig {
        &mut self.configs[channel.index()]
    }

    /// Replaces the configuration of `channel`.
    #[inline]
    pub fn set_config(&mut self, channel: Channel, config: ChannelConfig) {
        self.configs[channel.index()] = config;
    }

    /// Sets the three channel thresholds at once (red, green, blue).
    pub fn set_thresholds(&mut self, thresholds: [u8; 3]) {
        for ch in Channel::COLOR {
            self.configs[ch.index()].threshold = thresholds[ch.index()];
        }
    }

    /// Read access to the dependency chain, for ordering inspection.
    #[inline]
    pub fn chain(&self) -> &DependencyChain {
        &self.chain
    }

    /// Dispatches one pass over all enabled channels.
    ///
    /// Configurations are read once, here. Returns as soon as logical
    /// scheduling is done; the dispatched work completes asynchronously.
    /// At most one unit of work is in flight per channel: any work still
    /// outstanding from the previous pass is joined before dispatch.
    pub fn run_pass(&mut self) {
        self.complete_all();

        let mut prev = self.chain.sentinel().clone();
        for ch in Channel::COLOR {
            let config = self.configs[ch.index()];
            if !config.enabled {
                debug!(channel = %ch, pred = prev.ticket(), "fan-through");
                self.chain.advance_skipped(ch, &prev);
                continue;
            }

            let rule = ByteRule::resolve(&config);
            let pred = prev.clone();
            let handle = self.chain.advance_dispatched(ch, &pred);
            trace!(
                channel = %ch,
                ticket = handle.ticket(),
                pred = pred.ticket(),
                threshold = rule.threshold(),
                "dispatch"
            );

            let buffer = Arc::clone(&self.buffer);
            let done = handle.clone();
            self.workers.push(thread::spawn(move || {
                pred.wait();
                {
                    let mut buf = buffer.lock().unwrap_or_else(PoisonError::into_inner);
                    buf.view_mut(ch).apply(|v| rule.apply(v));
                }
                done.complete();
            }));

            prev = handle;
        }
    }

    /// Blocks until all dispatched work has finished.
    ///
    /// Waits (never spins); safe to call multiple times. Must precede any
    /// readback that requires up-to-date data, and all readback paths call
    /// it implicitly.
    pub fn complete_all(&mut self) {
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                warn!("channel worker panicked");
            }
        }
    }

    /// Zero-copy readback of the interleaved pixel bytes.
    ///
    /// Implicitly completes all outstanding work first; the returned view
    /// is post-transform-consistent and borrows the engine until dropped.
    pub fn output(&mut self) -> OutputRef<'_> {
        self.complete_all();
        OutputRef {
            guard: self.lock_buffer(),
        }
    }

    /// Copies the post-transform pixel bytes into `dst`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SizeMismatch`](bitflux_core::CoreError) if
    /// `dst` length differs from the buffer length.
    pub fn output_copy(&mut self, dst: &mut [u8]) -> CoreResult<()> {
        self.complete_all();
        self.lock_buffer().read_into(dst)
    }

    /// Overwrites the buffer with `src`.
    ///
    /// Joins outstanding work first, so an in-flight pass is never torn.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SizeMismatch`](bitflux_core::CoreError) if
    /// `src` length differs from the buffer length; the buffer keeps its
    /// prior contents in that case.
    pub fn update_input(&mut self, src: &[u8]) -> CoreResult<()> {
        self.complete_all();
        self.lock_buffer().write_from(src)
    }

    /// Discards the buffer and allocates anew for `new_pixel_count`
    /// zeroed pixels, resetting all chain handles to the sentinel.
    ///
    /// Joins outstanding work before the swap, so in-flight results remain
    /// fully visible (and are then discarded with the old allocation).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AllocationFailed`](bitflux_core::CoreError) on
    /// exhaustion; the prior buffer and chain state remain valid.
    pub fn reinitialize(&mut self, new_pixel_count: usize) -> CoreResult<()> {
        self.complete_all();
        self.lock_buffer().reinitialize(new_pixel_count)?;
        self.pixel_count = new_pixel_count;
        self.chain.reset();
        debug!(pixel_count = new_pixel_count, "engine reinitialized");
        Ok(())
    }

    fn lock_buffer(&self) -> MutexGuard<'_, PixelBuffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.complete_all();
    }
}

/// Zero-copy, read-only view of the engine's post-transform output.
///
/// Dereferences to the interleaved byte slice
/// (`pixel_count * `[`PIXEL_STRIDE`](bitflux_core::PIXEL_STRIDE) bytes).
/// Holding it keeps the buffer locked; drop it before the next pass.
pub struct OutputRef<'a> {
    guard: MutexGuard<'a, PixelBuffer>,
}

impl OutputRef<'_> {
    /// The interleaved pixel bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.guard.as_bytes()
    }
}

impl Deref for OutputRef<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.guard.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitflux_core::{BitOp, Comparator, Operand, PIXEL_STRIDE};

    fn interleave_red(red: &[u8]) -> Vec<u8> {
        red.iter()
            .flat_map(|&r| [r, 0, 0, 255])
            .collect()
    }

    #[test]
    fn test_disabled_pass_is_identity() {
        let mut engine = Engine::new(3).unwrap();
        let input = interleave_red(&[1, 2, 3]);
        engine.update_input(&input).unwrap();
        engine.run_pass();
        assert_eq!(&*engine.output(), &input[..]);
    }

    #[test]
    fn test_equal_xor_own_example() {
        let mut engine = Engine::new(4).unwrap();
        engine.update_input(&interleave_red(&[128, 5, 200, 128])).unwrap();
        engine.set_config(
            Channel::Red,
            ChannelConfig::new(Comparator::Equal, Operand::Own, BitOp::ExclusiveOr, 128),
        );

        engine.run_pass();
        engine.complete_all();

        let out = engine.output();
        let red: Vec<u8> = out.chunks_exact(PIXEL_STRIDE).map(|px| px[0]).collect();
        assert_eq!(red, vec![0, 5, 200, 0]);
    }

    #[test]
    fn test_all_channels_transform_disjointly() {
        let mut engine = Engine::new(2).unwrap();
        engine
            .update_input(&[10, 20, 30, 255, 40, 50, 60, 128])
            .unwrap();
        for ch in Channel::COLOR {
            engine.set_config(
                ch,
                ChannelConfig::new(Comparator::Less, Operand::Threshold, BitOp::Complement, 255),
            );
        }

        engine.run_pass();
        let out = engine.output();
        assert_eq!(&*out, &[245, 235, 225, 255, 215, 205, 195, 128]);
    }

    #[test]
    fn test_output_copy_and_mismatch() {
        let mut engine = Engine::new(2).unwrap();
        let mut dst = [0u8; 8];
        engine.output_copy(&mut dst).unwrap();

        let mut short = [0u8; 5];
        assert!(engine.output_copy(&mut short).unwrap_err().is_size_mismatch());
    }

    #[test]
    fn test_update_input_mismatch_keeps_buffer() {
        let mut engine = Engine::new(1).unwrap();
        engine.update_input(&[7, 8, 9, 10]).unwrap();
        assert!(engine.update_input(&[0; 3]).unwrap_err().is_size_mismatch());
        assert_eq!(&*engine.output(), &[7, 8, 9, 10]);
    }

    #[test]
    fn test_reinitialize_resets_chain_and_zeroes() {
        let mut engine = Engine::new(2).unwrap();
        engine.set_config(
            Channel::Red,
            ChannelConfig::new(Comparator::Less, Operand::Threshold, BitOp::Complement, 255),
        );
        engine.run_pass();
        engine.reinitialize(3).unwrap();

        assert_eq!(engine.pixel_count(), 3);
        assert_eq!(engine.output().len(), 12);
        for ch in Channel::COLOR {
            assert_eq!(
                engine.chain().slot(ch).ticket(),
                crate::SENTINEL_TICKET
            );
        }
    }

    #[test]
    fn test_set_thresholds() {
        let mut engine = Engine::new(1).unwrap();
        engine.set_thresholds([1, 2, 3]);
        assert_eq!(engine.config(Channel::Red).threshold, 1);
        assert_eq!(engine.config(Channel::Green).threshold, 2);
        assert_eq!(engine.config(Channel::Blue).threshold, 3);
    }
}
