//! Shared utilities for the stake farm.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat};
pub use time::{format_duration, time_to_next_period};
