//! Shared utilities for nodeshell.

pub mod logging;
pub mod stats;
pub mod time;

pub use logging::init_tracing;
pub use stats::StatsCounter;
pub use time::format_duration;
