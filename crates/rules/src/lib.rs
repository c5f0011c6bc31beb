//! Sinapsi rules.
//!
//! This crate provides the regex-keyed override layer of the answer service:
//! - Rule files in JSON or YAML, merged from several directories
//! - An immutable, ordered [`RuleStore`] with first-match lookup
//! - The text refiner applied to rule answers
//! - The rule applier that overrides, augments, or annotates a draft
//! - The internal connector catalog behind the technical note

pub mod applier;
pub mod connectors;
pub mod loader;
pub mod refiner;
pub mod store;
pub mod types;

// Re-export main types
pub use applier::{apply_rules, Applied, POSTSCRIPT_HEADING};
pub use connectors::{Connector, ConnectorCatalog, INTERNAL_NOTE_HEADING};
pub use loader::{discover_rule_files, load_rule_file};
pub use refiner::{has_sources_marker, refine, LEAD_SENTENCE, SOURCES_MARKER};
pub use store::RuleStore;
pub use types::{Attachment, Rule, RuleEntry, RuleMode};
