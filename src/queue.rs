//! Lock-free SPSC (Single Producer, Single Consumer) frame queue.
//!
//! The only point of contact between the two execution contexts.
//!
//! # Architecture
//!
//! ```text
//! Receive worker ──────▶ FrameQueue ──────▶ Transmit driver
//!   (core 1)             (bounded)            (core 0)
//! ```
//!
//! # Rules
//!
//! - Exactly one producer and one consumer; the type does not enforce it
//! - Frames move by value: a slot is owned by one side at a time
//! - FIFO, nothing dropped, nothing reordered
//! - Full queue blocks the producer, empty queue blocks the consumer
//! - Blocking is a spin: both contexts busy-poll anyway

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::frame::Frame;

/// Default queue depth: 16 frames.
pub const DEFAULT_QUEUE_DEPTH: usize = 16;

/// Bounded ring of frames.
///
/// # Memory Ordering
///
/// - Producer writes the slot, then publishes `tail` with `Release`
/// - Consumer loads `tail` with `Acquire`, reads the slot, then frees it by
///   publishing `head` with `Release`
/// - Producer loads `head` with `Acquire` before reusing a slot
pub struct FrameQueue<const N: usize = DEFAULT_QUEUE_DEPTH> {
    slots: UnsafeCell<[Frame; N]>,

    /// Next slot to read (monotonically increasing, wraps via mask).
    head: AtomicU32,

    /// Next slot to write (monotonically increasing, wraps via mask).
    tail: AtomicU32,
}

// SAFETY: Single producer, single consumer, atomic coordination.
// A slot is written only while outside [head, tail) and read only inside it.
unsafe impl<const N: usize> Sync for FrameQueue<N> {}
unsafe impl<const N: usize> Send for FrameQueue<N> {}

impl<const N: usize> FrameQueue<N> {
    const MASK: usize = N - 1;

    /// Create a new empty queue.
    ///
    /// # Panics
    ///
    /// Panics at compile time if N is not a power of 2.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Queue depth must be power of 2");

        Self {
            slots: UnsafeCell::new([Frame::EMPTY; N]),
            head: AtomicU32::new(0),
            tail: AtomicU32::new(0),
        }
    }

    /// Enqueue without blocking.
    ///
    /// Hands the frame back if the queue is full.
    #[inline]
    pub fn try_push(&self, frame: Frame) -> Result<(), Frame> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if tail.wrapping_sub(head) >= N as u32 {
            return Err(frame);
        }

        // SAFETY: Single producer; slot at tail is free (outside [head, tail))
        unsafe {
            (*self.slots.get())[(tail as usize) & Self::MASK] = frame;
        }
        self.tail.store(tail.wrapping_add(1), Ordering::Release);
        Ok(())
    }

    /// Enqueue, spinning while the queue is full.
    ///
    /// Returns `true` if the call had to wait (backpressure hit).
    #[inline]
    pub fn push_blocking(&self, frame: Frame) -> bool {
        let mut pending = frame;
        let mut waited = false;
        loop {
            match self.try_push(pending) {
                Ok(()) => return waited,
                Err(back) => {
                    pending = back;
                    waited = true;
                    core::hint::spin_loop();
                }
            }
        }
    }

    /// Dequeue without blocking.
    #[inline]
    pub fn try_pop(&self) -> Option<Frame> {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        if head == tail {
            return None;
        }

        // SAFETY: Single consumer; slot at head was published by tail store
        let frame = unsafe { (*self.slots.get())[(head as usize) & Self::MASK] };
        self.head.store(head.wrapping_add(1), Ordering::Release);
        Some(frame)
    }

    /// Dequeue, spinning while the queue is empty.
    #[inline]
    pub fn pop_blocking(&self) -> Frame {
        self.pop_blocking_with(core::hint::spin_loop)
    }

    /// Dequeue, calling `idle` on every empty poll.
    ///
    /// Lets the consumer do background work (log drain) while it waits.
    #[inline]
    pub fn pop_blocking_with(&self, mut idle: impl FnMut()) -> Frame {
        loop {
            if let Some(frame) = self.try_pop() {
                return frame;
            }
            idle();
        }
    }

    /// Frames currently queued.
    #[inline]
    pub fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        (tail.wrapping_sub(head) as usize).min(N)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() >= N
    }

    /// Get the queue capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for FrameQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
