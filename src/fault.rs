//! Fault state for the relay.
//!
//! Neither loop ever stops. A link fault is recorded here, logged, and the
//! loop resumes from a clean state: the receive side rescans, the transmit
//! side restarts the cycle from the idle/start sequence.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::error::{Line, LinkError};

/// Fault codes indicating what went wrong on the link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// A GPIO read or write failed.
    PinFault = 1,

    /// A line did not move within the configured poll budget.
    /// Only possible when a stall budget is set.
    LineStalled = 2,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::PinFault,
            2 => FaultCode::LineStalled,
            _ => FaultCode::None,
        }
    }

    /// Map a link error to its fault code and data word.
    ///
    /// For stalls the data word is the line (0 = clock, 1 = data).
    pub fn from_error(err: LinkError) -> (Self, u32) {
        match err {
            LinkError::Pin(_) => (FaultCode::PinFault, 0),
            LinkError::Stalled { line: Line::Clock } => (FaultCode::LineStalled, 0),
            LinkError::Stalled { line: Line::Data } => (FaultCode::LineStalled, 1),
        }
    }
}

/// Thread-safe fault state.
///
/// Written by either loop on a link error. Checked and cleared by the log
/// drain, which reports it.
pub struct FaultState {
    /// True if fault is active.
    active: AtomicBool,

    /// Fault code (reason for fault).
    code: AtomicU8,

    /// Additional data (see [`FaultCode::from_error`]).
    data: AtomicU32,

    /// Total fault count since boot (never cleared).
    count: AtomicU32,
}

impl FaultState {
    /// Create new fault state (no fault).
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Set fault state.
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    /// Record a link error.
    #[inline]
    pub fn record(&self, err: LinkError) {
        let (code, data) = FaultCode::from_error(err);
        self.set(code, data);
    }

    /// Check if fault is currently active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Get fault code (only meaningful if `is_active()` is true).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    /// Get fault data (meaning depends on fault code).
    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    /// Get total fault count since boot.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Clear the active flag. The counter is kept for diagnostics.
    #[inline]
    pub fn clear(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Take the active fault, if any, clearing it.
    #[inline]
    pub fn take(&self) -> Option<FaultSnapshot> {
        if self.active.swap(false, Ordering::AcqRel) {
            Some(FaultSnapshot {
                active: true,
                code: self.code(),
                data: self.data(),
                count: self.count(),
            })
        } else {
            None
        }
    }

    /// Get a snapshot of the current fault state.
    #[inline]
    pub fn snapshot(&self) -> FaultSnapshot {
        FaultSnapshot {
            active: self.is_active(),
            code: self.code(),
            data: self.data(),
            count: self.count(),
        }
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of fault state at a point in time.
#[derive(Clone, Copy, Debug)]
pub struct FaultSnapshot {
    pub active: bool,
    pub code: FaultCode,
    pub data: u32,
    pub count: u32,
}
