pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod tracker;
pub mod workflow;

pub use error::{BugToolError, Result};

#[cfg(test)]
pub mod test_helpers;
