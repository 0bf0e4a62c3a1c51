//! Tracks how much active time is spent on every website domain.
//! A thin browser extension forwards tab events to `tabtally-host` over native messaging, the
//! host accumulates seconds per domain into a small json store, and the `tabtally` cli reads the
//! store back as a list and a chart.
//!

pub mod cli;
pub mod daemon;
pub mod display;
pub mod fs;
pub mod host_api;
pub mod utils;

#[cfg(test)]
mod test_utils;
