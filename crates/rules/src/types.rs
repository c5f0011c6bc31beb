//! Rule types.

use regex::{Regex, RegexBuilder};
use crate::refiner::refine;
use serde::{Deserialize, Serialize};
use sinapsi_core::{AppError, AppResult};

/// How a matched rule combines with the web draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleMode {
    /// Replace the draft with the rule answer
    Override,
    /// Append the rule answer after the draft
    Augment,
    /// Append the rule answer under the technical-note heading
    Postscript,
}

impl RuleMode {
    /// Parse a mode string from a rule file.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "override" => Some(Self::Override),
            "augment" => Some(Self::Augment),
            "postscript" => Some(Self::Postscript),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::Augment => "augment",
            Self::Postscript => "postscript",
        }
    }
}

/// A link returned to the caller alongside the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub label: String,
    pub url: String,
}

impl Attachment {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// A compiled Sinapsi rule. Immutable once built.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Unique identifier, used in logs
    pub id: String,

    /// Case-insensitive match pattern
    pub pattern: Regex,

    pub mode: RuleMode,

    /// Language tag of the answer text (e.g. "it")
    pub lang: String,

    /// Answer text, refined before use
    pub answer: String,

    pub attachments: Vec<Attachment>,
}

impl Rule {
    /// Compile a rule. The pattern is matched case-insensitively.
    pub fn new(
        id: impl Into<String>,
        pattern: &str,
        mode: RuleMode,
        lang: impl Into<String>,
        answer: impl Into<String>,
    ) -> AppResult<Self> {
        let id = id.into();
        if pattern.trim().is_empty() {
            return Err(AppError::Rules(format!("Rule '{}' has an empty pattern", id)));
        }

        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::Rules(format!("Rule '{}' has an invalid pattern: {}", id, e)))?;

        Ok(Self {
            id,
            pattern: compiled,
            mode,
            lang: lang.into(),
            answer: answer.into(),
            attachments: Vec::new(),
        })
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn is_match(&self, question: &str) -> bool {
        self.pattern.is_match(question)
    }
}

/// A rule entry as written in a rule file.
///
/// Only `pattern` is required. See [`RuleEntry::into_rule`] for defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleEntry {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default, alias = "match")]
    pub pattern: String,

    #[serde(default)]
    pub mode: Option<String>,

    #[serde(default, alias = "language")]
    pub lang: Option<String>,

    #[serde(default, alias = "text")]
    pub answer: String,

    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl RuleEntry {
    /// Compile this entry into a [`Rule`].
    ///
    /// Defaults: id `fallback_id`, mode `augment` (also for unknown mode
    /// strings), lang `it`. Empty patterns, invalid regexes, and override
    /// rules whose answer refines to nothing are rejected.
    pub fn into_rule(self, fallback_id: &str) -> AppResult<Rule> {
        let id = self
            .id
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| fallback_id.to_string());

        let mode = match self.mode.as_deref() {
            None => RuleMode::Augment,
            Some(raw) => RuleMode::parse(raw).unwrap_or_else(|| {
                tracing::warn!("Rule '{}' has unknown mode '{}'; using augment", id, raw);
                RuleMode::Augment
            }),
        };

        if mode == RuleMode::Override && refine(&self.answer).is_empty() {
            return Err(AppError::Rules(format!(
                "Override rule '{}' has no answer text",
                id
            )));
        }

        let lang = self
            .lang
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "it".to_string());

        let attachments = self
            .attachments
            .into_iter()
            .filter(|a| !a.url.trim().is_empty())
            .collect();

        Ok(Rule::new(id, &self.pattern, mode, lang, self.answer)?.with_attachments(attachments))
    }
}
