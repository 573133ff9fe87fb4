//! Relay counters.
//!
//! Lock-free, shared by reference between both loops. Counters only grow;
//! they wrap after 2^32 events.

use core::sync::atomic::{AtomicU32, Ordering};

/// Frame counters for both sides of the relay.
pub struct RelayStats {
    received: AtomicU32,
    discarded: AtomicU32,
    rewritten: AtomicU32,
    transmitted: AtomicU32,
    backpressure: AtomicU32,
}

impl RelayStats {
    pub const fn new() -> Self {
        Self {
            received: AtomicU32::new(0),
            discarded: AtomicU32::new(0),
            rewritten: AtomicU32::new(0),
            transmitted: AtomicU32::new(0),
            backpressure: AtomicU32::new(0),
        }
    }

    /// Well-formed frame assembled.
    #[inline]
    pub fn frame_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    /// Malformed frame dropped by the assembler.
    #[inline]
    pub fn frame_discarded(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    /// First byte replaced by the rewrite rule.
    #[inline]
    pub fn frame_rewritten(&self) {
        self.rewritten.fetch_add(1, Ordering::Relaxed);
    }

    /// Frame fully clocked out.
    #[inline]
    pub fn frame_transmitted(&self) {
        self.transmitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Producer found the queue full.
    #[inline]
    pub fn backpressure_hit(&self) {
        self.backpressure.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            rewritten: self.rewritten.load(Ordering::Relaxed),
            transmitted: self.transmitted.load(Ordering::Relaxed),
            backpressure: self.backpressure.load(Ordering::Relaxed),
        }
    }
}

impl Default for RelayStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy of the counters at a point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub received: u32,
    pub discarded: u32,
    pub rewritten: u32,
    pub transmitted: u32,
    pub backpressure: u32,
}
