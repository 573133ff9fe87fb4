//! Simulated two-wire bus for host tests.
//!
//! Input side: a scripted waveform of (clock, data) samples. Every clock
//! read advances time by one sample; a data read returns the data level of
//! the sample the last clock read landed on. Reading past the end fails
//! with `SimError`, which ends any blocking scan cleanly.
//!
//! Output side: recording pins append the bus state after every write, and
//! every delay appends the current state once more (time passes).

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use busrelay::{
    BusInput, EdgeScanner, Frame, FrameAssembler, FrameQueue, TransmitDriver,
    config::TxTiming,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error, ErrorKind, ErrorType, InputPin, OutputPin};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimError;

impl Error for SimError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// (clock, data)
pub type Sample = (bool, bool);

// ---------------------------------------------------------------- input ---

#[derive(Default)]
struct Waveform {
    samples: Vec<Sample>,
    cursor: Option<usize>,
}

impl Waveform {
    fn current(&self) -> Result<Sample, SimError> {
        self.samples
            .get(self.cursor.unwrap_or(0))
            .copied()
            .ok_or(SimError)
    }
}

pub struct SimClockIn(Rc<RefCell<Waveform>>);
pub struct SimDataIn(Rc<RefCell<Waveform>>);

impl ErrorType for SimClockIn {
    type Error = SimError;
}

impl InputPin for SimClockIn {
    fn is_high(&mut self) -> Result<bool, SimError> {
        let mut wave = self.0.borrow_mut();
        wave.cursor = Some(wave.cursor.map_or(0, |c| c + 1));
        Ok(wave.current()?.0)
    }

    fn is_low(&mut self) -> Result<bool, SimError> {
        self.is_high().map(|high| !high)
    }
}

impl ErrorType for SimDataIn {
    type Error = SimError;
}

impl InputPin for SimDataIn {
    fn is_high(&mut self) -> Result<bool, SimError> {
        Ok(self.0.borrow().current()?.1)
    }

    fn is_low(&mut self) -> Result<bool, SimError> {
        self.is_high().map(|high| !high)
    }
}

pub type SimInput = BusInput<SimClockIn, SimDataIn>;

/// Input pins replaying `samples`.
pub fn sim_input(samples: Vec<Sample>) -> SimInput {
    let wave = Rc::new(RefCell::new(Waveform {
        samples,
        cursor: None,
    }));
    BusInput::new(SimClockIn(wave.clone()), SimDataIn(wave))
}

pub fn sim_scanner(samples: Vec<Sample>) -> EdgeScanner<SimClockIn, SimDataIn> {
    EdgeScanner::new(sim_input(samples))
}

pub fn sim_assembler(samples: Vec<Sample>) -> FrameAssembler<SimClockIn, SimDataIn> {
    FrameAssembler::new(sim_scanner(samples))
}

/// Hand-built waveforms in the receiver's encoding.
///
/// Every state is held for `hold` samples so the scanner has to poll
/// through repeated levels.
pub struct WaveBuilder {
    samples: Vec<Sample>,
    hold: usize,
}

impl WaveBuilder {
    pub fn new(hold: usize) -> Self {
        Self {
            samples: Vec::new(),
            hold: hold.max(1),
        }
    }

    pub fn state(mut self, clk: bool, dio: bool) -> Self {
        for _ in 0..self.hold {
            self.samples.push((clk, dio));
        }
        self
    }

    /// Clock low, data low.
    pub fn idle(self) -> Self {
        self.state(false, false)
    }

    /// Data set up, one clock pulse.
    pub fn bit(self, bit: bool) -> Self {
        self.state(false, bit).state(true, bit).state(false, bit)
    }

    pub fn bits(self, bits: &[bool]) -> Self {
        bits.iter().fold(self, |b, &bit| b.bit(bit))
    }

    /// All bytes, LSB first.
    pub fn bytes(self, bytes: &[u8]) -> Self {
        bytes.iter().fold(self, |b, &byte| {
            (0..8).fold(b, |b, i| b.bit((byte >> i) & 1 == 1))
        })
    }

    /// Clock rises with data low, then data rises while the clock is high.
    /// Follows with the start condition that opens the next frame.
    pub fn frame_end(self) -> Self {
        self.state(false, false)
            .state(true, false)
            .state(true, true)
            .state(true, false)
            .state(false, false)
    }

    pub fn frame(self, bytes: &[u8]) -> Self {
        self.bytes(bytes).frame_end()
    }

    pub fn build(self) -> Vec<Sample> {
        self.samples
    }
}

// --------------------------------------------------------------- output ---

#[derive(Default)]
pub struct Trace {
    clk: bool,
    dio: bool,
    samples: Vec<Sample>,
    delays_us: Vec<u32>,
    fail_writes: bool,
}

pub type SharedTrace = Rc<RefCell<Trace>>;

pub struct RecClockOut(SharedTrace);
pub struct RecDataOut(SharedTrace);
pub struct RecDelay(SharedTrace);

impl ErrorType for RecClockOut {
    type Error = SimError;
}

impl OutputPin for RecClockOut {
    fn set_low(&mut self) -> Result<(), SimError> {
        record(&self.0, |t| t.clk = false)
    }

    fn set_high(&mut self) -> Result<(), SimError> {
        record(&self.0, |t| t.clk = true)
    }
}

impl ErrorType for RecDataOut {
    type Error = SimError;
}

impl OutputPin for RecDataOut {
    fn set_low(&mut self) -> Result<(), SimError> {
        record(&self.0, |t| t.dio = false)
    }

    fn set_high(&mut self) -> Result<(), SimError> {
        record(&self.0, |t| t.dio = true)
    }
}

fn record(trace: &SharedTrace, apply: impl FnOnce(&mut Trace)) -> Result<(), SimError> {
    let mut t = trace.borrow_mut();
    if t.fail_writes {
        return Err(SimError);
    }
    apply(&mut t);
    let state = (t.clk, t.dio);
    t.samples.push(state);
    Ok(())
}

impl DelayNs for RecDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_us(&mut self, us: u32) {
        let mut t = self.0.borrow_mut();
        t.delays_us.push(us);
        let state = (t.clk, t.dio);
        t.samples.push(state);
    }
}

pub type RecDriver = TransmitDriver<RecClockOut, RecDataOut, RecDelay>;

/// Transmit driver writing into a fresh trace that starts at (low, low).
pub fn rec_driver() -> (RecDriver, SharedTrace) {
    let trace: SharedTrace = Rc::new(RefCell::new(Trace::default()));
    trace.borrow_mut().samples.push((false, false));
    let driver = TransmitDriver::new(
        RecClockOut(trace.clone()),
        RecDataOut(trace.clone()),
        RecDelay(trace.clone()),
        TxTiming::default(),
    );
    (driver, trace)
}

pub fn trace_samples(trace: &SharedTrace) -> Vec<Sample> {
    trace.borrow().samples.clone()
}

pub fn trace_delays(trace: &SharedTrace) -> Vec<u32> {
    trace.borrow().delays_us.clone()
}

pub fn fail_writes(trace: &SharedTrace, fail: bool) {
    trace.borrow_mut().fail_writes = fail;
}

/// Transmit `frames` back to back and close the last one with an
/// idle/start sequence, returning the recorded waveform.
pub fn transmit_all(frames: &[Frame]) -> Vec<Sample> {
    let (mut driver, trace) = rec_driver();
    let queue: FrameQueue = FrameQueue::new();
    for frame in frames {
        queue.try_push(*frame).unwrap();
        driver.cycle(&queue, || {}).unwrap();
    }
    driver.idle_start().unwrap();
    trace_samples(&trace)
}

/// Read frames until the waveform runs out.
pub fn decode_all(samples: Vec<Sample>) -> Vec<Frame> {
    let mut assembler = sim_assembler(samples);
    let mut frames = Vec::new();
    while let Ok(frame) = assembler.read_frame() {
        frames.push(frame);
    }
    frames
}

pub fn frame(bytes: &[u8]) -> Frame {
    Frame::from_bytes(bytes).unwrap()
}
