//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod approve;
pub mod control;
pub mod create_agent;
pub mod export;
pub mod follow_up;
pub mod orchestrate;
pub mod replan;
pub mod supervisor;
#[cfg(test)]
pub(crate) mod test_support;
