//! First-byte rewrite rule.
//!
//! Frames whose first byte matches `10xxxxxx` get that byte replaced by one
//! of five fixed values. The value rotates every 10 frames over a 50-frame
//! cycle. The phase advances on every frame seen, rewritten or not.

use crate::frame::Frame;

/// Mask and pattern selecting the bytes that get rewritten.
pub const MATCH_MASK: u8 = 0b1100_0000;
pub const MATCH_PATTERN: u8 = 0b1000_0000;

/// Frames per replacement value.
pub const FRAMES_PER_STEP: u8 = 10;

/// Replacement values, in rotation order.
pub const REPLACEMENTS: [u8; 5] = [
    0b1000_1000,
    0b1000_1001,
    0b1000_1010,
    0b1000_1011,
    0b1000_1111,
];

/// Length of one full rotation.
pub const CYCLE_LEN: u8 = FRAMES_PER_STEP * REPLACEMENTS.len() as u8;

/// Stateful rewriter holding the rotation phase.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameRewriter {
    phase: u8,
    enabled: bool,
}

impl FrameRewriter {
    pub fn new(enabled: bool) -> Self {
        Self { phase: 0, enabled }
    }

    /// True if `byte` is a rewrite target.
    #[inline]
    pub fn matches(byte: u8) -> bool {
        byte & MATCH_MASK == MATCH_PATTERN
    }

    /// Replacement for a given phase in `0..CYCLE_LEN`.
    #[inline]
    pub fn replacement_for(phase: u8) -> u8 {
        let step = (phase % CYCLE_LEN) / FRAMES_PER_STEP;
        REPLACEMENTS[step as usize]
    }

    /// Apply the rule to one frame and advance the phase.
    ///
    /// Returns `true` if the first byte was replaced.
    pub fn apply(&mut self, frame: &mut Frame) -> bool {
        let phase = self.phase;
        self.phase = (self.phase + 1) % CYCLE_LEN;

        if !self.enabled {
            return false;
        }
        match frame.first() {
            Some(first) if Self::matches(first) => {
                frame.set_first(Self::replacement_for(phase));
                true
            }
            _ => false,
        }
    }

    /// Current rotation phase (frames seen modulo the cycle length).
    #[inline]
    pub fn phase(&self) -> u8 {
        self.phase
    }
}
