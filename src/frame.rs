//! Module: frame
//!
//! Purpose: The single unit of data that crosses the relay. One frame is one
//! byte sequence delimited on the wire by the frame-end edge pattern.
//!
//! Architecture:
//! - Fixed-capacity inline buffer, `Copy`, so ownership moves by value into
//!   and out of the queue without allocation
//! - The wire carries no length field; capacity bounds the bytes stored
//!
//! Safety: Safe. No unsafe blocks.

/// Defensive upper bound on payload bytes per frame.
///
/// The protocol never announces a length; real traffic stays far below this.
pub const MAX_FRAME_BYTES: usize = 31;

/// One assembled frame.
///
/// `len` only counts whole bytes. A frame handed out by the assembler always
/// has `1 <= len <= MAX_FRAME_BYTES`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    data: [u8; MAX_FRAME_BYTES],
    len: u8,
}

impl Frame {
    /// Empty frame, used as the initial queue slot value.
    pub const EMPTY: Self = Self {
        data: [0; MAX_FRAME_BYTES],
        len: 0,
    };

    /// Build a frame from a byte slice.
    ///
    /// Returns `None` if the slice is longer than [`MAX_FRAME_BYTES`].
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > MAX_FRAME_BYTES {
            return None;
        }
        let mut frame = Self::EMPTY;
        frame.data[..bytes.len()].copy_from_slice(bytes);
        frame.len = bytes.len() as u8;
        Some(frame)
    }

    /// Payload bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// Number of payload bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True if the frame carries no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First payload byte, if any.
    #[inline]
    pub fn first(&self) -> Option<u8> {
        self.as_bytes().first().copied()
    }

    /// Overwrite the first payload byte. No-op on an empty frame.
    #[inline]
    pub fn set_first(&mut self, value: u8) {
        if self.len > 0 {
            self.data[0] = value;
        }
    }

    /// Store one received bit at absolute bit position `bit_count`
    /// (LSB-first within each byte).
    ///
    /// Returns `false` if the position lies beyond capacity; the bit is
    /// not stored.
    #[inline]
    pub(crate) fn put_bit(&mut self, bit_count: usize, bit: bool) -> bool {
        let byte_idx = bit_count / 8;
        let bit_idx = bit_count % 8;
        match self.data.get_mut(byte_idx) {
            Some(byte) => {
                *byte |= (bit as u8) << bit_idx;
                true
            }
            None => false,
        }
    }

    /// Seal the frame at `len` whole bytes.
    #[inline]
    pub(crate) fn seal(&mut self, len: usize) {
        self.len = len.min(MAX_FRAME_BYTES) as u8;
    }

    /// Drop all progress, back to an empty buffer.
    #[inline]
    pub(crate) fn clear(&mut self) {
        *self = Self::EMPTY;
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::EMPTY
    }
}
