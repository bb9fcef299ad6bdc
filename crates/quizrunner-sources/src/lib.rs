//! quizrunner-sources: Bank sources, discovery, and configuration.
//!
//! Implements the `BankSource` and `BankCatalog` traits for a directory on
//! disk and for in-memory banks, and loads quizrunner's configuration.

pub mod config;
pub mod directory;
pub mod memory;

pub use config::{load_config_from, QuizrunnerConfig};
pub use directory::DirectorySource;
pub use memory::MemorySource;
