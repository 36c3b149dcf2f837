//! Progress indicators for planner calls

pub mod spinner;

pub use spinner::PlannerSpinner;
