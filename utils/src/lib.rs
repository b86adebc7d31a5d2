//! Shared utilities for the STAY ledger.

pub mod logging;

pub use logging::init_tracing;
