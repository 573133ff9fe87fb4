//! Frame assembler.
//!
//! Drives the [`EdgeScanner`] and packs bits LSB-first into a [`Frame`].
//! A frame is accepted only when the frame-end marker lands on a byte
//! boundary after at least one byte. Anything else is bus noise: progress is
//! dropped, the assembler waits for the clock to go low again and starts
//! over. Discards are routine and never reported as errors.

use embedded_hal::digital::InputPin;

use crate::error::LinkError;
use crate::frame::Frame;
use crate::scanner::{EdgeScanner, Scan};

/// Why a frame was thrown away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Discard {
    /// Frame end with no bits before it.
    Empty,
    /// Frame end in the middle of a byte.
    Misaligned { bits: u32 },
    /// More bits than [`MAX_FRAME_BYTES`](crate::frame::MAX_FRAME_BYTES) can hold.
    Overflow { bits: u32 },
}

/// Bit-to-frame packer on top of an edge scanner.
pub struct FrameAssembler<CLK, DIO> {
    scanner: EdgeScanner<CLK, DIO>,
    last_discard: Option<Discard>,
}

impl<CLK: InputPin, DIO: InputPin> FrameAssembler<CLK, DIO> {
    pub fn new(scanner: EdgeScanner<CLK, DIO>) -> Self {
        Self {
            scanner,
            last_discard: None,
        }
    }

    /// Scan exactly one frame.
    ///
    /// Waits for a low clock, then collects bits up to the next frame-end
    /// marker. Returns `Ok(None)` if that frame was malformed; the caller can
    /// simply call again, which resyncs on the next low clock.
    pub fn try_read_frame(&mut self) -> Result<Option<Frame>, LinkError> {
        let mut frame = Frame::EMPTY;
        let mut bit_count: usize = 0;
        let mut overflowed = false;

        self.scanner.wait_clock_low()?;
        loop {
            match self.scanner.scan()? {
                Scan::FrameEnd => {
                    let bits = bit_count as u32;
                    let verdict = if overflowed {
                        Err(Discard::Overflow { bits })
                    } else if bit_count == 0 {
                        Err(Discard::Empty)
                    } else if bit_count % 8 != 0 {
                        Err(Discard::Misaligned { bits })
                    } else {
                        Ok(bit_count / 8)
                    };

                    return match verdict {
                        Ok(len) => {
                            frame.seal(len);
                            Ok(Some(frame))
                        }
                        Err(reason) => {
                            frame.clear();
                            self.last_discard = Some(reason);
                            Ok(None)
                        }
                    };
                }
                scan => {
                    let bit = scan == Scan::Bit1;
                    if !frame.put_bit(bit_count, bit) {
                        overflowed = true;
                    }
                    bit_count = bit_count.saturating_add(1);
                }
            }
        }
    }

    /// Block until a well-formed frame arrives.
    ///
    /// Malformed frames in between are skipped silently.
    pub fn read_frame(&mut self) -> Result<Frame, LinkError> {
        loop {
            if let Some(frame) = self.try_read_frame()? {
                return Ok(frame);
            }
        }
    }

    /// Reason for the most recent discard.
    #[inline]
    pub fn last_discard(&self) -> Option<Discard> {
        self.last_discard
    }
}
