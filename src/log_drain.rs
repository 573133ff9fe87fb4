//! Log drain: moves records from the log rings to a byte sink.
//!
//! On the device the sink is a TX-only UART:
//!
//! ```text
//! ESP32 GPIO6 (UART1 TX) ──────▶ USB-UART RX
//!                                 └─▶ PC Serial Monitor
//! ```
//!
//! The drain runs from the transmit loop's idle hook, while it waits for the
//! next frame. One call writes a bounded number of records so a burst of logs
//! never delays a frame by more than a few lines.

use core::fmt::Write;

use crate::fault::{FaultCode, FaultState};
use crate::logging::{BufWriter, LogEntry, LogStream};

/// Records written per drain call.
pub const RECORDS_PER_PASS: usize = 4;

/// Interval between dropped-record reports.
pub const DROP_REPORT_INTERVAL_US: i64 = 10_000_000;

/// Format log entry as `[timestamp_us] LEVEL: message\n`.
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    let mut writer = BufWriter::new(buf);
    let _ = write!(
        writer,
        "[{:10}] {}: {}\n",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.message()
    );
    writer.len()
}

/// Drain state.
pub struct LogDrain<'a> {
    streams: &'a [&'a LogStream],
    fault: &'a FaultState,
    last_drop_report_us: i64,
}

impl<'a> LogDrain<'a> {
    /// Drain `streams` in priority order (first ring drained first).
    pub fn new(streams: &'a [&'a LogStream], fault: &'a FaultState) -> Self {
        Self {
            streams,
            fault,
            last_drop_report_us: 0,
        }
    }

    /// Write pending output to `sink`.
    ///
    /// Returns `true` if anything was written.
    pub fn pass(&mut self, now_us: i64, mut sink: impl FnMut(&[u8])) -> bool {
        let mut buf = [0u8; 160];
        let mut written = 0;

        if let Some(fault) = self.fault.take() {
            let mut w = BufWriter::new(&mut buf);
            let _ = write!(
                w,
                "[{:10}] ERROR: fault {} data={} total={}\n",
                now_us,
                fault_name(fault.code),
                fault.data,
                fault.count
            );
            let len = w.len();
            sink(&buf[..len]);
            written += 1;
        }

        'rings: for stream in self.streams {
            while written < RECORDS_PER_PASS {
                match stream.drain() {
                    Some(entry) => {
                        let len = format_log_entry(&entry, &mut buf);
                        sink(&buf[..len]);
                        written += 1;
                    }
                    None => continue 'rings,
                }
            }
            break;
        }

        if now_us - self.last_drop_report_us > DROP_REPORT_INTERVAL_US {
            let dropped: u32 = self.streams.iter().map(|s| s.dropped()).sum();
            if dropped > 0 {
                let mut w = BufWriter::new(&mut buf);
                let _ = write!(w, "[{:10}] WARN: dropped {} log records\n", now_us, dropped);
                let len = w.len();
                sink(&buf[..len]);
                written += 1;
                for stream in self.streams {
                    stream.reset_dropped();
                }
            }
            self.last_drop_report_us = now_us;
        }

        written > 0
    }
}

fn fault_name(code: FaultCode) -> &'static str {
    match code {
        FaultCode::None => "none",
        FaultCode::PinFault => "pin",
        FaultCode::LineStalled => "stalled",
    }
}
