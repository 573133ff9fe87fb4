//! Link error types.
//!
//! Malformed frames are NOT errors: the assembler drops them and resyncs.
//! Only conditions that stop a loop from making progress end up here.

use embedded_hal::digital::ErrorKind;

/// One of the two sampled bus lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    /// Clock-in.
    Clock,
    /// Data-in.
    Data,
}

impl Line {
    /// Short name for log output.
    pub fn as_str(self) -> &'static str {
        match self {
            Line::Clock => "CLK",
            Line::Data => "DIO",
        }
    }
}

/// Error raised by the receive or transmit side of the link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkError {
    /// E01: GPIO read or write failed
    Pin(ErrorKind),
    /// E02: Line did not reach the awaited level within the poll budget
    Stalled { line: Line },
}

impl LinkError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Pin(_) => "E01",
            Self::Stalled { .. } => "E02",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::Pin(_) => "pin i/o failed",
            Self::Stalled { .. } => "line stalled",
        }
    }

    /// Wrap any `embedded-hal` digital error.
    pub fn pin<E: embedded_hal::digital::Error>(err: E) -> Self {
        Self::Pin(err.kind())
    }
}

impl core::fmt::Display for LinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Pin(kind) => write!(f, "{}: {} ({:?})", self.code(), self.message(), kind),
            Self::Stalled { line } => {
                write!(f, "{}: {} on {}", self.code(), self.message(), line.as_str())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LinkError::Pin(ErrorKind::Other).code(), "E01");
        assert_eq!(LinkError::Stalled { line: Line::Clock }.code(), "E02");
    }

    #[test]
    fn test_display_names_line() {
        let text = format!("{}", LinkError::Stalled { line: Line::Data });
        assert_eq!(text, "E02: line stalled on DIO");
    }
}
