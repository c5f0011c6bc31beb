//! Rule applier: combines the first matching rule with the web draft.

use crate::refiner::refine;
use crate::store::RuleStore;
use crate::types::{Attachment, RuleMode};

/// Heading placed above `postscript` rule answers.
pub const POSTSCRIPT_HEADING: &str = "📌 Nota tecnica:";

/// Result of applying the rule store to a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub text: String,

    /// Id of the applied rule, `None` when nothing matched
    pub rule_id: Option<String>,

    pub mode: Option<RuleMode>,

    pub attachments: Vec<Attachment>,

    /// Web sources must not be cited (set for `override`)
    pub drop_sources: bool,
}

impl Applied {
    fn unchanged(draft: &str) -> Self {
        Self {
            text: draft.to_string(),
            rule_id: None,
            mode: None,
            attachments: Vec::new(),
            drop_sources: false,
        }
    }
}

/// Apply the first rule matching `question` to `draft`.
///
/// Without a match the draft is returned unchanged.
pub fn apply_rules(store: &RuleStore, question: &str, draft: &str) -> Applied {
    let rule = match store.match_question(question) {
        Some(rule) => rule,
        None => return Applied::unchanged(draft),
    };

    tracing::debug!("Applying rule {} ({})", rule.id, rule.mode.as_str());

    let answer = refine(&rule.answer);
    let base = draft.trim_end();

    let text = match rule.mode {
        RuleMode::Override => answer,
        _ if answer.is_empty() => draft.to_string(),
        RuleMode::Augment if base.trim().is_empty() => answer,
        RuleMode::Augment => format!("{}\n\n{}", base, answer),
        RuleMode::Postscript if base.trim().is_empty() => {
            format!("{}\n{}", POSTSCRIPT_HEADING, answer)
        }
        RuleMode::Postscript => format!("{}\n\n{}\n{}", base, POSTSCRIPT_HEADING, answer),
    };

    Applied {
        text,
        rule_id: Some(rule.id.clone()),
        mode: Some(rule.mode),
        attachments: rule.attachments.clone(),
        drop_sources: rule.mode == RuleMode::Override,
    }
}
