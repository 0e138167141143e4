//! The half-buffer handshake between DMA interrupt and player task.
//!
//! The audio ring is one contiguous sample array split into two equal
//! halves. The DMA engine transmits it circularly and raises an interrupt
//! at the half mark and at the end; each interrupt means "the half I just
//! finished is drained and safe to overwrite".
//!
//! [`HalfFlags`] carries one valid flag per half and is the *only* state
//! shared between the two contexts:
//!
//! - the interrupt handler only ever **clears** the flag of the half it
//!   just finished with ([`HalfFlags::mark_drained`]);
//! - the task-context poll only ever **writes sample data** into a half it
//!   found cleared, then sets the flag again.
//!
//! The interrupt never touches sample memory, so the one-bit-per-event
//! handshake replaces a lock. Flags are atomics with acquire/release
//! ordering so the data writes are published before the flag flips.

use core::sync::atomic::{AtomicBool, Ordering};

/// One of the two equal partitions of the audio ring buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Half {
    /// First half of the ring (transmitted first).
    Lower,
    /// Second half of the ring.
    Upper,
}

impl Half {
    /// Both halves, in refill order.
    pub const ALL: [Half; 2] = [Half::Lower, Half::Upper];

    pub(crate) const fn index(self) -> usize {
        match self {
            Half::Lower => 0,
            Half::Upper => 1,
        }
    }
}

/// DMA completion event, as decoded by the interrupt handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaEvent {
    /// Transfer-half-complete: the engine crossed the ring midpoint, so the
    /// *lower* half has been sent out.
    HalfComplete,
    /// Transfer-complete: the engine wrapped around, so the *upper* half
    /// has been sent out.
    TransferComplete,
}

impl DmaEvent {
    /// The half whose transmission this event reports as finished.
    pub const fn drained_half(self) -> Half {
        match self {
            DmaEvent::HalfComplete => Half::Lower,
            DmaEvent::TransferComplete => Half::Upper,
        }
    }
}

/// Per-half "contains data not yet sent" flags.
///
/// `const fn new()` so a `HalfFlags` can live in a `static` and be handed
/// by reference to both the interrupt handler and the player.
pub struct HalfFlags {
    valid: [AtomicBool; 2],
}

impl HalfFlags {
    /// Both halves start drained.
    pub const fn new() -> Self {
        Self {
            valid: [AtomicBool::new(false), AtomicBool::new(false)],
        }
    }

    /// Interrupt side: record that the half belonging to `event` has been
    /// fully transmitted and may be refilled.
    ///
    /// This is the only mutation the interrupt context performs; it never
    /// fails and never touches sample data.
    #[inline]
    pub fn mark_drained(&self, event: DmaEvent) {
        self.valid[event.drained_half().index()].store(false, Ordering::Release);
    }

    /// Task side: publish a freshly written half.
    ///
    /// Must be called *after* the sample writes so the release store
    /// orders them before the flag flip.
    #[inline]
    pub fn set_valid(&self, half: Half) {
        self.valid[half.index()].store(true, Ordering::Release);
    }

    /// Task side: is this half still waiting to be transmitted?
    #[inline]
    pub fn is_valid(&self, half: Half) -> bool {
        self.valid[half.index()].load(Ordering::Acquire)
    }

    /// `true` once neither half holds unsent data — the quiescence
    /// condition the stop sequence waits for.
    pub fn all_drained(&self) -> bool {
        !self.is_valid(Half::Lower) && !self.is_valid(Half::Upper)
    }

    /// Reset both flags to drained (used on init and full stop).
    pub fn clear(&self) {
        self.valid[0].store(false, Ordering::Release);
        self.valid[1].store(false, Ordering::Release);
    }
}

impl Default for HalfFlags {
    fn default() -> Self {
        Self::new()
    }
}
