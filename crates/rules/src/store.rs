//! Immutable, ordered rule store.

use crate::loader::{discover_rule_files, load_rule_file};
use crate::types::Rule;
use std::path::PathBuf;

/// Ordered list of compiled rules. Read-only after construction.
///
/// Priority is file order (ascending file name) then array order within a
/// file. Share it across requests with `Arc<RuleStore>`.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    rules: Vec<Rule>,
}

impl RuleStore {
    /// Load every rule file found in `dirs`.
    ///
    /// Never fails: missing directories are ignored and malformed files are
    /// skipped with a warning, so an unreadable configuration degrades to
    /// an empty store.
    pub fn load(dirs: &[PathBuf]) -> Self {
        let mut rules = Vec::new();

        for path in discover_rule_files(dirs) {
            match load_rule_file(&path) {
                Ok(mut loaded) => rules.append(&mut loaded),
                Err(e) => tracing::warn!("Skipping rule file: {}", e),
            }
        }

        tracing::info!("Loaded {} Sinapsi rules", rules.len());
        Self { rules }
    }

    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// First rule whose pattern matches the question.
    pub fn match_question(&self, question: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.is_match(question))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RuleMode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_first_match_wins() {
        let store = RuleStore::from_rules(vec![
            Rule::new("wide", "connettor", RuleMode::Augment, "it", "generale").unwrap(),
            Rule::new("narrow", "connettori ctf", RuleMode::Override, "it", "ctf").unwrap(),
        ]);

        let rule = store.match_question("Quali connettori CTF uso?").unwrap();
        assert_eq!(rule.id, "wide");
        assert!(store.match_question("lamiera grecata").is_none());
    }

    #[test]
    fn test_load_merges_in_file_name_order() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("20-extra.yaml"),
            "- id: second\n  pattern: ctf\n  answer: dopo\n",
        )
        .unwrap();
        fs::write(
            temp.path().join("10-base.json"),
            r#"[{"id": "first", "pattern": "ctf", "answer": "prima"}]"#,
        )
        .unwrap();
        fs::write(temp.path().join("30-broken.json"), "[{").unwrap();

        let store = RuleStore::load(&[temp.path().to_path_buf()]);
        let ids: Vec<&str> = store.rules().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
        assert_eq!(store.match_question("CTF").unwrap().id, "first");
    }

    #[test]
    fn test_load_from_missing_directories_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = RuleStore::load(&[temp.path().join("nope")]);
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }
}
