//! Serve command handler.

use crate::app::build_pipeline;
use clap::Args;
use sinapsi_core::{config::AppConfig, AppError, AppResult};
use std::sync::Arc;

/// Start the HTTP API server
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to bind (default: 0.0.0.0:8000)
    #[arg(short, long, env = "SINAPSI_BIND")]
    pub bind: Option<String>,
}

impl ServeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing serve command");

        let pipeline = build_pipeline(config)?;
        tracing::info!(
            "Serving {} rules with {} search",
            pipeline.rules().len(),
            pipeline.provider_name()
        );

        sinapsi_server::run_server(&config.bind, Arc::new(pipeline))
            .await
            .map_err(|e| AppError::Other(format!("Server failed: {}", e)))
    }
}
