//! # BusRelay
//!
//! Inline relay for a two-wire (clock + data) synchronous serial bus.
//!
//! ## Architecture
//!
//! ```text
//! CLK/DIO in ─▶ EdgeScanner ─▶ FrameAssembler ─▶ ReceiveWorker ─┐  core 1
//!                                                               │
//!                                                          FrameQueue
//!                                                               │
//! CLK/DIO out ◀──────────────────────────────── TransmitDriver ◀┘  core 0
//! ```
//!
//! - The receive side decodes frames from edge ordering alone, no timers
//! - The transmit side regenerates the signal with its own clock
//! - The queue is the only shared resource between the two contexts
//! - Pins are `embedded-hal` traits: the whole pipeline runs on the host
//!   against a simulated bus

#![cfg_attr(not(test), no_std)]

pub mod assembler;
pub mod config;
pub mod error;
pub mod fault;
pub mod frame;
pub mod hal;
pub mod log_drain;
pub mod log_globals;
pub mod logging;
pub mod queue;
pub mod receiver;
pub mod rewrite;
pub mod scanner;
pub mod stats;
pub mod transmitter;

pub use assembler::{Discard, FrameAssembler};
pub use config::{RelayConfig, CONFIG};
pub use error::{Line, LinkError};
pub use fault::{FaultCode, FaultState};
pub use frame::{Frame, MAX_FRAME_BYTES};
pub use hal::BusInput;
pub use log_globals::{RX_LOG, TX_LOG};
pub use queue::FrameQueue;
pub use receiver::{ReceiveWorker, RxShared};
pub use rewrite::FrameRewriter;
pub use scanner::{EdgeScanner, Scan};
pub use stats::RelayStats;
pub use transmitter::{TransmitDriver, TxShared};
