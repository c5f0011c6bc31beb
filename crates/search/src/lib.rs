//! Web search integration for Sinapsi.
//!
//! This crate provides a provider-agnostic abstraction over the external
//! search APIs, plus the allow-list filter that decides which result hosts
//! may be fetched and cited.
//!
//! # Providers
//! - **Brave**: Brave Search API (default)
//! - **Bing**: Bing Web Search v7
//! - **Noop**: stands in when the selected provider has no credentials
//!
//! # Example
//! ```no_run
//! use sinapsi_search::{create_client, DomainFilter, WebSearchAdapter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_client("brave", Some("token"), None, 6)?;
//! let adapter = WebSearchAdapter::new(client, DomainFilter::new(["tecnaria.com"]), 5);
//! for result in adapter.search("connettori CTF lamiera").await {
//!     println!("{} ({})", result.title, result.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod client;
pub mod domains;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use adapter::WebSearchAdapter;
pub use client::{SearchResult, WebSearch};
pub use domains::DomainFilter;
pub use factory::create_client;
pub use providers::{BingClient, BraveClient, NoopSearch};
pub use types::ProviderType;
