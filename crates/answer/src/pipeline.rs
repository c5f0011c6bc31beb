//! Request handler.
//!
//! [`AnswerPipeline`] owns the shared, immutable collaborators and runs one
//! question through search, synthesis, rule application and composition.

use crate::compose::compose;
use crate::guard::{is_off_topic, OFF_TOPIC_MESSAGE};
use crate::synth::Synthesizer;
use crate::wizard::{WizardKey, WizardParams};
use serde::Serialize;
use sinapsi_rules::{
    apply_rules, Attachment, ConnectorCatalog, RuleStore, INTERNAL_NOTE_HEADING,
};
use sinapsi_search::WebSearchAdapter;
use std::sync::Arc;
use tracing::Instrument;

/// Answer for a blank question. No search is performed.
pub const EMPTY_QUESTION_MESSAGE: &str = "Scrivi una domanda tecnica sui prodotti Tecnaria \
     (connettori, lamiere, solai, chiodatrice P560).";

/// Answer when neither the web nor the rules produced any text.
pub const FALLBACK_MESSAGE: &str = "Non ho trovato informazioni sufficienti. \
     Indica i dettagli del progetto (tipo di solaio, lamiera, spessore della soletta, carichi) \
     per una risposta tecnica più precisa.";

/// Question mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AskMode {
    #[default]
    Generic,
    /// CTF connector sizing, fed by the wizard
    Ctf,
}

impl AskMode {
    /// Parse a mode string. Unknown or missing values mean `Generic`.
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(|m| m.trim().to_lowercase()).as_deref() {
            Some("ctf") => Self::Ctf,
            _ => Self::Generic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Ctf => "ctf",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AskInput {
    pub question: String,
    pub mode: AskMode,
    pub context: String,
}

impl AskInput {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: AskMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Append formatted wizard parameters to the context.
    pub fn with_params(mut self, params: &WizardParams) -> Self {
        let formatted = params.format_context();
        if formatted.is_empty() {
            return self;
        }
        if self.context.trim().is_empty() {
            self.context = formatted;
        } else {
            self.context = format!("{}, {}", self.context.trim(), formatted);
        }
        self
    }
}

/// Parameters the wizard still has to collect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskMeta {
    pub needs_params: bool,
    pub required_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskOutcome {
    pub answer: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<AskMeta>,

    /// Applied rule, for logs only
    #[serde(skip)]
    pub rule_id: Option<String>,

    /// Sources cited in the footer
    #[serde(skip)]
    pub sources: Vec<String>,
}

pub struct AnswerPipeline {
    rules: Arc<RuleStore>,
    connectors: Arc<ConnectorCatalog>,
    search: WebSearchAdapter,
    synthesizer: Synthesizer,
}

impl AnswerPipeline {
    pub fn new(rules: Arc<RuleStore>, search: WebSearchAdapter, synthesizer: Synthesizer) -> Self {
        Self {
            rules,
            connectors: Arc::new(ConnectorCatalog::empty()),
            search,
            synthesizer,
        }
    }

    /// Use `connectors` for internal technical notes.
    pub fn with_connectors(mut self, connectors: Arc<ConnectorCatalog>) -> Self {
        self.connectors = connectors;
        self
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    pub fn connectors(&self) -> &ConnectorCatalog {
        &self.connectors
    }

    pub fn provider_name(&self) -> &str {
        self.search.provider_name()
    }

    /// Answer one question. Never fails.
    pub async fn ask(&self, input: AskInput) -> AskOutcome {
        let span = tracing::info_span!("ask", mode = input.mode.as_str());
        self.run(input).instrument(span).await
    }

    async fn run(&self, input: AskInput) -> AskOutcome {
        let meta = ctf_meta(&input);
        let question = input.question.trim();

        if question.is_empty() {
            tracing::debug!("Empty question");
            return fixed_reply(EMPTY_QUESTION_MESSAGE, meta);
        }

        // A matching rule always outranks the guard.
        if self.rules.match_question(question).is_none() && is_off_topic(question) {
            tracing::info!("Off-topic question refused");
            return fixed_reply(OFF_TOPIC_MESSAGE, meta);
        }

        let results = self.search.search(question).await;
        let draft = self.synthesizer.synthesize(&results).await;
        let applied = apply_rules(&self.rules, question, &draft.text);

        let (text, sources) = if applied.drop_sources {
            (applied.text, Vec::new())
        } else {
            let text = match self.connectors.note_for(question) {
                Some(note) => append_note(&applied.text, &note),
                None => applied.text,
            };
            (text, draft.sources)
        };

        let answer = if text.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            compose(&text, &sources)
        };

        tracing::info!(
            results = results.len(),
            sources = sources.len(),
            rule = applied.rule_id.as_deref().unwrap_or("-"),
            "Answered question"
        );

        AskOutcome {
            answer,
            attachments: applied.attachments,
            meta,
            rule_id: applied.rule_id,
            sources,
        }
    }
}

fn fixed_reply(message: &str, meta: Option<AskMeta>) -> AskOutcome {
    AskOutcome {
        answer: message.to_string(),
        attachments: Vec::new(),
        meta,
        rule_id: None,
        sources: Vec::new(),
    }
}

fn append_note(text: &str, note: &str) -> String {
    let text = text.trim_end();
    if text.is_empty() {
        format!("{}\n{}", INTERNAL_NOTE_HEADING, note)
    } else {
        format!("{}\n\n{}\n{}", text, INTERNAL_NOTE_HEADING, note)
    }
}

fn ctf_meta(input: &AskInput) -> Option<AskMeta> {
    if input.mode != AskMode::Ctf {
        return None;
    }

    let missing = WizardParams::parse_context(&input.context).missing(&WizardKey::REQUIRED_CTF);
    Some(AskMeta {
        needs_params: !missing.is_empty(),
        required_keys: missing.iter().map(|k| k.as_str().to_string()).collect(),
    })
}
