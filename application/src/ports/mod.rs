//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod activity_logger;
pub mod executor_policy;
pub mod export_writer;
pub mod persistence;
pub mod planner;
pub mod ui_event;
pub mod update_sink;
