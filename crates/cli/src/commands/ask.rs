//! Ask command handler.
//!
//! Runs one question through the pipeline and prints the answer.

use crate::app::build_pipeline;
use clap::Args;
use sinapsi_answer::{AskInput, AskMode};
use sinapsi_core::{config::AppConfig, AppResult};

/// Ask a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Question mode (generic, ctf)
    #[arg(short, long, default_value = "generic")]
    pub mode: String,

    /// Wizard context string (e.g. "lamiera H55, soletta 60 mm")
    #[arg(long)]
    pub context: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let pipeline = build_pipeline(config)?;

        let input = AskInput::new(self.question.clone())
            .with_mode(AskMode::parse(Some(self.mode.as_str())))
            .with_context(self.context.clone().unwrap_or_default());

        let outcome = pipeline.ask(input).await;
        if let Some(rule_id) = &outcome.rule_id {
            tracing::debug!("Applied rule: {}", rule_id);
        }

        if self.json {
            let json = serde_json::to_string_pretty(&outcome)?;
            println!("{}", json);
            return Ok(());
        }

        println!("{}", outcome.answer);

        for attachment in &outcome.attachments {
            println!("📎 {} <{}>", attachment.label, attachment.url);
        }

        if let Some(meta) = &outcome.meta {
            if meta.needs_params {
                eprintln!("Missing wizard parameters: {}", meta.required_keys.join(", "));
            }
        }

        Ok(())
    }
}
