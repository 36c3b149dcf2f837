//! Application-level configuration.
//!
//! - [`ExecutionTimings`] - delays between the orchestrator's phases

pub mod execution_timings;

pub use execution_timings::ExecutionTimings;
