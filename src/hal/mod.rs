//! Hardware Abstraction Layer for the bus relay.
//!
//! Thin layer over `embedded-hal` pins. Protocol logic stays in the core
//! modules, HAL is just I/O.

pub mod line;

pub use line::{BusInput, PollBudget};
