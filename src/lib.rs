pub mod cli;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod executor;
pub mod git;
pub mod release;
pub mod tasks;
pub mod ui;
pub mod version;
pub mod warning;

pub use error::{Result, TaskError};
