//! Sinapsi answer pipeline.
//!
//! Chains the stages behind a single question:
//! search → fetch and clean → synthesize → apply rules → compose.
//! Off-topic questions are refused before searching, and questions naming
//! a catalogued connector get an internal technical note.
//!
//! Every stage is best effort. Network failures and missing configuration
//! degrade to empty values, and the caller always receives an answer.

pub mod compose;
pub mod fetch;
pub mod guard;
pub mod html;
pub mod pipeline;
pub mod synth;
pub mod wizard;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use compose::compose;
pub use fetch::{HttpFetcher, PageFetcher};
pub use guard::{is_off_topic, OFF_TOPIC_MESSAGE};
pub use pipeline::{
    AnswerPipeline, AskInput, AskMeta, AskMode, AskOutcome, EMPTY_QUESTION_MESSAGE,
    FALLBACK_MESSAGE,
};
pub use synth::{Draft, Synthesizer};
pub use wizard::{WizardKey, WizardParams};
