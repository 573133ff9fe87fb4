//! Receive worker.
//!
//! Runs on its own execution context. Assembles frames, applies the rewrite
//! rule and publishes them to the [`FrameQueue`]. A full queue blocks here,
//! which throttles frame acceptance instead of dropping frames.

use embedded_hal::digital::InputPin;

use crate::assembler::FrameAssembler;
use crate::error::LinkError;
use crate::fault::FaultState;
use crate::frame::Frame;
use crate::logging::LogStream;
use crate::queue::FrameQueue;
use crate::rewrite::FrameRewriter;
use crate::stats::RelayStats;
use crate::{rt_debug, rt_error, rt_warn};

/// Shared handles the worker publishes into.
#[derive(Clone, Copy)]
pub struct RxShared<'a, const Q: usize> {
    pub queue: &'a FrameQueue<Q>,
    pub stats: &'a RelayStats,
    pub fault: &'a FaultState,
    pub log: &'a LogStream,
    /// Microsecond clock for log timestamps.
    pub now_us: fn() -> i64,
}

/// Assembler + rewriter + queue producer.
pub struct ReceiveWorker<'a, CLK, DIO, const Q: usize> {
    assembler: FrameAssembler<CLK, DIO>,
    rewriter: FrameRewriter,
    shared: RxShared<'a, Q>,
}

impl<'a, CLK: InputPin, DIO: InputPin, const Q: usize> ReceiveWorker<'a, CLK, DIO, Q> {
    pub fn new(
        assembler: FrameAssembler<CLK, DIO>,
        rewriter: FrameRewriter,
        shared: RxShared<'a, Q>,
    ) -> Self {
        Self {
            assembler,
            rewriter,
            shared,
        }
    }

    /// Scan one frame from the bus and, if well-formed, publish it.
    ///
    /// Returns the published frame, or `None` if the scan ended in a
    /// discard.
    pub fn step(&mut self) -> Result<Option<Frame>, LinkError> {
        let Some(mut frame) = self.assembler.try_read_frame()? else {
            self.shared.stats.frame_discarded();
            if let Some(reason) = self.assembler.last_discard() {
                rt_debug!(self.shared.log, (self.shared.now_us)(), "discard {:?}", reason);
            }
            return Ok(None);
        };
        self.shared.stats.frame_received();

        let original = frame.first();
        if self.rewriter.apply(&mut frame) {
            self.shared.stats.frame_rewritten();
            rt_debug!(
                self.shared.log,
                (self.shared.now_us)(),
                "rewrite {:#04x} -> {:#04x}",
                original.unwrap_or(0),
                frame.first().unwrap_or(0)
            );
        }

        self.publish(frame);
        Ok(Some(frame))
    }

    /// Publish a frame, blocking while the queue is full.
    pub fn publish(&mut self, frame: Frame) {
        let queue = self.shared.queue;
        if queue.try_push(frame).is_ok() {
            return;
        }

        self.shared.stats.backpressure_hit();
        rt_warn!(
            self.shared.log,
            (self.shared.now_us)(),
            "queue full ({}), holding receive",
            queue.capacity()
        );
        queue.push_blocking(frame);
    }

    /// One iteration of the receive loop.
    ///
    /// A link error is recorded and logged and yields `None`; the next call
    /// starts a fresh scan, which resyncs on the next low clock.
    pub fn poll(&mut self) -> Option<Frame> {
        match self.step() {
            Ok(frame) => frame,
            Err(err) => {
                self.shared.fault.record(err);
                rt_error!(self.shared.log, (self.shared.now_us)(), "rx: {}", err);
                None
            }
        }
    }

    /// Relay forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.poll();
        }
    }

    pub fn rewriter(&self) -> &FrameRewriter {
        &self.rewriter
    }
}
