//! Core state management for MindMuscle: personal records, fitness goals and study topics.

pub mod collections;
pub mod config;
pub mod derive;
pub mod error;
pub mod form;
pub mod goal_ops;
pub mod pr_ops;
pub mod prompt;
pub mod record;
pub mod render;
pub mod store;
pub mod study_ops;
#[cfg(test)]
mod test_env;
pub mod tracker;
pub mod views;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
