//! Edge scanner: classifies one bus clock cycle.
//!
//! # Wire encoding
//!
//! ```text
//!            Bit 0          Bit 1          Frame end
//!            ___            ___            ______
//!   CLK  ___|   |___    ___|   |___    ___|      |__
//!                          _______            ___
//!   DIO  ____________   __|       |_   ______|   |__
//! ```
//!
//! Data is sampled at the rising clock edge. High means `Bit1`. Low is
//! ambiguous: if the clock falls first it was `Bit0`, if data rises while the
//! clock is still high it was the frame-end marker. The two cannot be told
//! apart until the trailing event, so the scanner keeps sampling past the
//! rising edge instead of classifying eagerly.

use embedded_hal::digital::InputPin;

use crate::error::{Line, LinkError};
use crate::hal::BusInput;

/// Classification of one clock cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scan {
    Bit0,
    Bit1,
    FrameEnd,
}

impl Scan {
    /// Bit value, or `None` for the frame-end marker.
    #[inline]
    pub fn bit(self) -> Option<bool> {
        match self {
            Scan::Bit0 => Some(false),
            Scan::Bit1 => Some(true),
            Scan::FrameEnd => None,
        }
    }
}

/// Edge-triggered bit classifier over live line samples.
///
/// Purely combinatorial: no timers, only the order in which edges appear.
pub struct EdgeScanner<CLK, DIO> {
    input: BusInput<CLK, DIO>,
}

impl<CLK: InputPin, DIO: InputPin> EdgeScanner<CLK, DIO> {
    pub fn new(input: BusInput<CLK, DIO>) -> Self {
        Self { input }
    }

    /// Block until the clock line reads low.
    ///
    /// [`scan`](Self::scan) must only start from a low clock.
    #[inline]
    pub fn wait_clock_low(&mut self) -> Result<(), LinkError> {
        self.input.wait_for_level(Line::Clock, false)
    }

    /// Classify the next clock cycle.
    ///
    /// Caller guarantees the clock is low on entry. Returns once the cycle's
    /// trailing event has been seen: the falling clock edge for a bit, or the
    /// rising data edge for a frame end (the clock is still high then).
    pub fn scan(&mut self) -> Result<Scan, LinkError> {
        self.input.wait_for_level(Line::Clock, true)?;

        if self.input.level(Line::Data)? {
            self.input.wait_for_level(Line::Clock, false)?;
            return Ok(Scan::Bit1);
        }

        // Data low at the rising edge: whichever edge comes first decides.
        let mut budget = self.input.budget(Line::Clock);
        loop {
            if !self.input.level(Line::Clock)? {
                return Ok(Scan::Bit0);
            }
            if self.input.level(Line::Data)? {
                return Ok(Scan::FrameEnd);
            }
            budget.spend()?;
        }
    }

    /// Access the underlying line sampler.
    pub fn input(&self) -> &BusInput<CLK, DIO> {
        &self.input
    }
}
