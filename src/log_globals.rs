//! Global log rings, one per execution context.

use crate::logging::LogStream;

/// Transmit loop ring (core 0, main task).
pub static TX_LOG: LogStream = LogStream::new();

/// Receive worker ring (core 1).
pub static RX_LOG: LogStream = LogStream::new();
