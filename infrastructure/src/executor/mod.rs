//! Executor policy adapters

mod random_outcome;

pub use random_outcome::RandomOutcomeExecutor;
