//! Planner adapters

mod mock_planner;

pub use mock_planner::MockPlanner;
