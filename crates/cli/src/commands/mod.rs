//! Command handlers for the Sinapsi CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod rules;
pub mod serve;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use rules::RulesCommand;
pub use serve::ServeCommand;
