//! Completion tokens and the cross-channel dependency chain.
//!
//! Channel execution order is a singly-linked precedence chain over the
//! enabled channels in fixed priority order red -> green -> blue:
//!
//! ```text
//! sentinel ──► red ──► green ──► blue
//!                 \────────────► blue     (green disabled: fan-through)
//! ```
//!
//! - Red's predecessor is always the pre-completed sentinel.
//! - Each later channel's predecessor is the handle of the nearest enabled
//!   channel before it; a disabled channel is transparent and forwards the
//!   predecessor it would have had (the fan-through skip rule).
//!
//! The chain records, per slot, the current handle and the ticket of the
//! predecessor resolved for it, so scheduling decisions are observable in
//! tests without timing games.
//!
//! Waiting is condvar-based; a waiter blocks, it never spins.

use std::sync::{Arc, Condvar, Mutex, PoisonError};

use bitflux_core::Channel;

/// Ticket id of the sentinel (always-complete) handle.
pub const SENTINEL_TICKET: u64 = 0;

/// Completion state shared between a dispatched unit of work and its
/// waiters.
#[derive(Debug)]
struct HandleState {
    done: Mutex<bool>,
    cv: Condvar,
}

/// An opaque token for one dispatched unit of work.
///
/// Clones share completion state. A handle is queryable for completion and
/// usable as another unit's precedence input. Ticket ids are monotonically
/// increasing per chain; the sentinel is ticket [`SENTINEL_TICKET`].
#[derive(Debug, Clone)]
pub struct DispatchHandle {
    state: Arc<HandleState>,
    ticket: u64,
}

impl DispatchHandle {
    fn new(ticket: u64, done: bool) -> Self {
        Self {
            state: Arc::new(HandleState {
                done: Mutex::new(done),
                cv: Condvar::new(),
            }),
            ticket,
        }
    }

    /// The unique ticket id of this unit of work.
    #[inline]
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Returns `true` if the unit of work has completed.
    pub fn is_complete(&self) -> bool {
        *self
            .state
            .done
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks the calling thread until the unit of work completes.
    pub fn wait(&self) {
        let mut done = self
            .state
            .done
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while !*done {
            done = self
                .state
                .cv
                .wait(done)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Marks the unit of work complete and wakes all waiters.
    pub(crate) fn complete(&self) {
        let mut done = self
            .state
            .done
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *done = true;
        self.state.cv.notify_all();
    }
}

/// Tracks the last unit of work per chain slot and resolves each
/// channel's ordering predecessor.
///
/// One instance lives in the engine across passes. Within a pass the
/// engine walks channels in priority order, calling
/// [`advance_dispatched`](Self::advance_dispatched) or
/// [`advance_skipped`](Self::advance_skipped) exactly once per channel.
#[derive(Debug)]
pub struct DependencyChain {
    sentinel: DispatchHandle,
    slots: [DispatchHandle; 3],
    predecessors: [u64; 3],
    next_ticket: u64,
}

impl DependencyChain {
    /// Creates a chain with every slot at the sentinel.
    pub fn new() -> Self {
        let sentinel = DispatchHandle::new(SENTINEL_TICKET, true);
        Self {
            slots: [sentinel.clone(), sentinel.clone(), sentinel.clone()],
            predecessors: [SENTINEL_TICKET; 3],
            sentinel,
            next_ticket: 1,
        }
    }

    /// The pre-completed sentinel handle.
    #[inline]
    pub fn sentinel(&self) -> &DispatchHandle {
        &self.sentinel
    }

    /// Current handle in `channel`'s slot.
    #[inline]
    pub fn slot(&self, channel: Channel) -> &DispatchHandle {
        &self.slots[channel.index()]
    }

    /// Ticket of the predecessor resolved for `channel` in the most recent
    /// pass that advanced it.
    #[inline]
    pub fn predecessor_ticket(&self, channel: Channel) -> u64 {
        self.predecessors[channel.index()]
    }

    /// Advances `channel`'s slot with a freshly ticketed handle whose
    /// predecessor is `pred`, and returns the new handle.
    ///
    /// The returned handle is incomplete; the dispatched worker signals it
    /// through [`DispatchHandle::complete`] when done.
    pub(crate) fn advance_dispatched(
        &mut self,
        channel: Channel,
        pred: &DispatchHandle,
    ) -> DispatchHandle {
        let handle = DispatchHandle::new(self.next_ticket, false);
        self.next_ticket += 1;
        self.slots[channel.index()] = handle.clone();
        self.predecessors[channel.index()] = pred.ticket();
        handle
    }

    /// Advances a disabled `channel`'s slot to its fan-through
    /// predecessor, so the next pass resolves ordering from correct state.
    pub(crate) fn advance_skipped(&mut self, channel: Channel, pred: &DispatchHandle) {
        self.slots[channel.index()] = pred.clone();
        self.predecessors[channel.index()] = pred.ticket();
    }

    /// Resets every slot to the sentinel. Used on buffer reinitialization.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            *slot = self.sentinel.clone();
        }
        self.predecessors = [SENTINEL_TICKET; 3];
    }
}

impl Default for DependencyChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_complete() {
        let chain = DependencyChain::new();
        assert!(chain.sentinel().is_complete());
        assert_eq!(chain.sentinel().ticket(), SENTINEL_TICKET);
        // wait() on a complete handle returns immediately
        chain.sentinel().wait();
    }

    #[test]
    fn test_tickets_are_monotonic() {
        let mut chain = DependencyChain::new();
        let pred = chain.sentinel().clone();
        let a = chain.advance_dispatched(Channel::Red, &pred);
        let b = chain.advance_dispatched(Channel::Green, &a);
        assert!(a.ticket() < b.ticket());
        assert_eq!(chain.predecessor_ticket(Channel::Green), a.ticket());
    }

    #[test]
    fn test_fan_through_records_inherited_predecessor() {
        let mut chain = DependencyChain::new();
        let sentinel = chain.sentinel().clone();

        let red = chain.advance_dispatched(Channel::Red, &sentinel);
        chain.advance_skipped(Channel::Green, &red);
        let green_slot = chain.slot(Channel::Green).clone();
        let _blue = chain.advance_dispatched(Channel::Blue, &green_slot);

        // Green's slot forwarded red's handle, so blue chains off red.
        assert_eq!(chain.predecessor_ticket(Channel::Blue), red.ticket());
        assert_eq!(chain.slot(Channel::Green).ticket(), red.ticket());
    }

    #[test]
    fn test_wait_blocks_until_complete() {
        let mut chain = DependencyChain::new();
        let pred = chain.sentinel().clone();
        let handle = chain.advance_dispatched(Channel::Red, &pred);
        assert!(!handle.is_complete());

        let waiter = handle.clone();
        let t = std::thread::spawn(move || {
            waiter.wait();
            true
        });
        handle.complete();
        assert!(t.join().unwrap());
        assert!(handle.is_complete());
    }

    #[test]
    fn test_reset_returns_to_sentinel() {
        let mut chain = DependencyChain::new();
        let pred = chain.sentinel().clone();
        let handle = chain.advance_dispatched(Channel::Blue, &pred);
        handle.complete();

        chain.reset();
        for ch in Channel::COLOR {
            assert_eq!(chain.slot(ch).ticket(), SENTINEL_TICKET);
            assert_eq!(chain.predecessor_ticket(ch), SENTINEL_TICKET);
        }
    }
}
