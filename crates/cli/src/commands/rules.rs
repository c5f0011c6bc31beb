//! Rules command handler.

use clap::Args;
use sinapsi_core::{config::AppConfig, AppResult};
use sinapsi_rules::RuleStore;

/// List loaded Sinapsi rules in priority order
#[derive(Args, Debug)]
pub struct RulesCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl RulesCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing rules command");

        let store = RuleStore::load(&config.rules_dirs);

        if self.json {
            let rules: Vec<serde_json::Value> = store
                .rules()
                .iter()
                .map(|rule| {
                    serde_json::json!({
                        "id": rule.id,
                        "pattern": rule.pattern.as_str(),
                        "mode": rule.mode.as_str(),
                        "lang": rule.lang,
                        "attachments": rule.attachments,
                    })
                })
                .collect();

            let json = serde_json::to_string_pretty(&rules)?;
            println!("{}", json);
            return Ok(());
        }

        if store.is_empty() {
            println!("No rules loaded from {:?}", config.rules_dirs);
            return Ok(());
        }

        for (position, rule) in store.rules().iter().enumerate() {
            println!(
                "{:>3}. {} [{}/{}] /{}/",
                position + 1,
                rule.id,
                rule.mode.as_str(),
                rule.lang,
                rule.pattern.as_str()
            );
        }

        Ok(())
    }
}
