//! Search provider implementations.

pub mod bing;
pub mod brave;
pub mod noop;

pub use bing::BingClient;
pub use brave::BraveClient;
pub use noop::NoopSearch;
