//! User interface and interaction
//!
//! This module contains all components related to user interaction,
//! including CLI parsing, report rendering, progress spinners,
//! and shell completion generation.

pub mod cli;
pub mod completion;
pub mod progress;
pub mod report;

// Re-export commonly used items
pub use cli::{Cli, Commands, cli_to_config};
pub use completion::print_completions;
pub use progress::ProgressReporter;
