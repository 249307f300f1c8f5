//! replacer: find and replace regex patterns across a directory tree
//!
//! The core is exposed as a library so integration and property tests can
//! exercise it directly. The binary is at src/main.rs.

pub mod backup_manager;
pub mod cli;
pub mod config;
pub mod diff_formatter;
pub mod file_processor;
pub mod logger;
pub mod selector;

// Re-export commonly used types for convenience
pub use config::{RunConfig, DEFAULT_EXCLUDES};
pub use diff_formatter::{ColorScheme, DiffFormatter};
pub use file_processor::{FileDiff, FileProcessor, LineChange};
pub use selector::Selector;
