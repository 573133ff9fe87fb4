//! Transmit driver.
//!
//! Regenerates the two-wire signal with its own clock. One cycle:
//!
//! ```text
//!          idle/start   dequeue     start         bit 0 .. bit n      end
//!   CLK  __/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾\____/‾\__/‾\__ ... /‾\_______
//!   DIO  _____/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾\_________<b0>-<b1>- ... <bn>_______
//! ```
//!
//! Data rising while the clock is high is what the receive side reads as
//! the frame-end marker, so the idle/start sequence of one cycle terminates
//! the frame sent in the previous one. Data falling while the clock is high
//! opens the next frame. Hold times are part of the wire contract.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use crate::config::TxTiming;
use crate::error::LinkError;
use crate::fault::FaultState;
use crate::frame::Frame;
use crate::logging::LogStream;
use crate::queue::FrameQueue;
use crate::rt_error;
use crate::stats::RelayStats;

/// Shared handles the transmit loop consumes from and reports into.
#[derive(Clone, Copy)]
pub struct TxShared<'a, const Q: usize> {
    pub queue: &'a FrameQueue<Q>,
    pub stats: &'a RelayStats,
    pub fault: &'a FaultState,
    pub log: &'a LogStream,
    pub now_us: fn() -> i64,
}

/// Self-clocked encoder onto clock-out / data-out.
pub struct TransmitDriver<CLK, DIO, D> {
    clk: CLK,
    dio: DIO,
    delay: D,
    timing: TxTiming,
}

impl<CLK: OutputPin, DIO: OutputPin, D: DelayNs> TransmitDriver<CLK, DIO, D> {
    pub fn new(clk: CLK, dio: DIO, delay: D, timing: TxTiming) -> Self {
        Self {
            clk,
            dio,
            delay,
            timing,
        }
    }

    #[inline]
    fn clock(&mut self, high: bool) -> Result<(), LinkError> {
        self.clk
            .set_state(PinState::from(high))
            .map_err(LinkError::pin)
    }

    #[inline]
    fn data(&mut self, high: bool) -> Result<(), LinkError> {
        self.dio
            .set_state(PinState::from(high))
            .map_err(LinkError::pin)
    }

    /// Step 1: clock high, then data high.
    ///
    /// Leaves the bus idle. Terminates any frame sent before it.
    pub fn idle_start(&mut self) -> Result<(), LinkError> {
        self.clock(true)?;
        self.delay.delay_us(self.timing.short_hold_us);
        self.data(true)
    }

    /// Steps 3-5: start sequence, every bit LSB-first, then data low.
    pub fn send_frame(&mut self, frame: &Frame) -> Result<(), LinkError> {
        let short = self.timing.short_hold_us;
        let long = self.timing.long_hold_us;

        self.delay.delay_us(long);
        self.data(false)?;
        self.delay.delay_us(short);
        self.clock(false)?;
        self.delay.delay_us(short);

        for &byte in frame.as_bytes() {
            for bit in 0..8 {
                self.data((byte >> bit) & 1 == 1)?;
                self.delay.delay_us(short);
                self.clock(true)?;
                self.delay.delay_us(long);
                self.clock(false)?;
                self.delay.delay_us(short);
            }
        }

        self.data(false)?;
        self.delay.delay_us(long);
        Ok(())
    }

    /// One full cycle: idle/start, wait for a frame, send it.
    ///
    /// `idle` runs on every empty poll of the queue while the bus is parked
    /// in the idle state.
    pub fn cycle<const Q: usize>(
        &mut self,
        queue: &FrameQueue<Q>,
        idle: impl FnMut(),
    ) -> Result<Frame, LinkError> {
        self.idle_start()?;
        let frame = queue.pop_blocking_with(idle);
        self.send_frame(&frame)?;
        Ok(frame)
    }

    /// One iteration of the transmit loop.
    ///
    /// Counts the frame once it is fully on the wire. A pin error abandons
    /// the current frame and is recorded and logged; the next call restarts
    /// from the idle/start sequence.
    pub fn relay_once<const Q: usize>(
        &mut self,
        shared: &TxShared<'_, Q>,
        idle: impl FnMut(),
    ) -> Option<Frame> {
        match self.cycle(shared.queue, idle) {
            Ok(frame) => {
                shared.stats.frame_transmitted();
                Some(frame)
            }
            Err(err) => {
                shared.fault.record(err);
                rt_error!(shared.log, (shared.now_us)(), "tx: {}", err);
                None
            }
        }
    }

    /// Transmit forever.
    pub fn run<const Q: usize>(&mut self, shared: TxShared<'_, Q>, mut idle: impl FnMut()) -> ! {
        loop {
            self.relay_once(&shared, &mut idle);
        }
    }
}
