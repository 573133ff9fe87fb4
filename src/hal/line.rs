//! Busy-poll line sampling.
//!
//! Every wait the receive side performs goes through [`BusInput`]. Edge
//! detection is a spin on `is_high()` with no yield: the clock must be seen
//! with minimal latency. Swapping in interrupt-driven detection only means
//! replacing `wait_for_level`.

use embedded_hal::digital::InputPin;

use crate::error::{Line, LinkError};

/// Clock-in and data-in pins plus an optional stall budget.
pub struct BusInput<CLK, DIO> {
    clk: CLK,
    dio: DIO,
    stall_poll_limit: Option<u32>,
}

impl<CLK: InputPin, DIO: InputPin> BusInput<CLK, DIO> {
    /// Wrap the two input pins. Waits block forever.
    pub fn new(clk: CLK, dio: DIO) -> Self {
        Self {
            clk,
            dio,
            stall_poll_limit: None,
        }
    }

    /// Bound every wait to `limit` polls. `None` restores unbounded waits.
    pub fn with_stall_limit(mut self, limit: Option<u32>) -> Self {
        self.stall_poll_limit = limit;
        self
    }

    /// Current poll budget.
    #[inline]
    pub fn stall_poll_limit(&self) -> Option<u32> {
        self.stall_poll_limit
    }

    /// Sample one line.
    #[inline]
    pub fn level(&mut self, line: Line) -> Result<bool, LinkError> {
        match line {
            Line::Clock => self.clk.is_high().map_err(LinkError::pin),
            Line::Data => self.dio.is_high().map_err(LinkError::pin),
        }
    }

    /// Spin until `line` reads `level`.
    #[inline]
    pub fn wait_for_level(&mut self, line: Line, level: bool) -> Result<(), LinkError> {
        let mut budget = self.budget(line);
        loop {
            if self.level(line)? == level {
                return Ok(());
            }
            budget.spend()?;
        }
    }

    /// Fresh poll budget for a wait on `line`.
    #[inline]
    pub fn budget(&self, line: Line) -> PollBudget {
        PollBudget {
            line,
            remaining: self.stall_poll_limit,
        }
    }
}

/// Countdown of polls left before a wait is declared stalled.
#[derive(Clone, Copy, Debug)]
pub struct PollBudget {
    line: Line,
    remaining: Option<u32>,
}

impl PollBudget {
    /// Account for one unsuccessful poll.
    #[inline]
    pub fn spend(&mut self) -> Result<(), LinkError> {
        match self.remaining.as_mut() {
            None => Ok(()),
            Some(0) => Err(LinkError::Stalled { line: self.line }),
            Some(n) => {
                *n -= 1;
                Ok(())
            }
        }
    }
}
