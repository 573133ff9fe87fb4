//! Module: config
//!
//! Purpose: Compile-time configuration for the relay.
//!
//! The relay has no runtime configuration surface. Everything lives in
//! [`CONFIG`]; hardware groups also implement `Default` so tests can start
//! from the shipped values and override single fields.

/// GPIO assignment for the four bus lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusPins {
    pub data_in: i32,
    pub clock_in: i32,
    pub data_out: i32,
    pub clock_out: i32,
}

impl BusPins {
    pub const DEFAULT: Self = Self {
        data_in: 2,
        clock_in: 3,
        data_out: 4,
        clock_out: 5,
    };
}

impl Default for BusPins {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Hold times of the regenerated signal, in microseconds.
///
/// These are part of the wire contract: a downstream listener expects data
/// to settle `short_hold_us` before the rising clock edge and the clock to
/// stay high for `long_hold_us`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxTiming {
    pub short_hold_us: u32,
    pub long_hold_us: u32,
}

impl TxTiming {
    pub const DEFAULT: Self = Self {
        short_hold_us: 3,
        long_hold_us: 5,
    };
}

impl Default for TxTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// UART used to drain the log rings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogUartConfig {
    pub tx_pin: i32,
    pub baud_rate: u32,
}

impl LogUartConfig {
    pub const DEFAULT: Self = Self {
        tx_pin: 6, // UART1 TX, needs an external USB-UART adapter
        baud_rate: 115_200,
    };
}

impl Default for LogUartConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Full relay configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelayConfig {
    pub pins: BusPins,
    pub timing: TxTiming,
    /// Poll budget for a single line wait. `None` blocks forever on a
    /// stalled line.
    pub stall_poll_limit: Option<u32>,
    /// Apply the first-byte rewrite rule to relayed frames.
    pub rewrite_enabled: bool,
    pub log_uart: LogUartConfig,
    /// Receive task stack in bytes.
    pub rx_stack_size: usize,
    /// Receive task FreeRTOS priority.
    pub rx_priority: u8,
}

impl RelayConfig {
    pub const DEFAULT: Self = Self {
        pins: BusPins::DEFAULT,
        timing: TxTiming::DEFAULT,
        stall_poll_limit: None,
        rewrite_enabled: true,
        log_uart: LogUartConfig::DEFAULT,
        rx_stack_size: 8192,
        rx_priority: 10,
    };
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Shipped configuration.
pub const CONFIG: RelayConfig = RelayConfig::DEFAULT;
