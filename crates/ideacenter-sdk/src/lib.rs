pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod suite;
pub mod types;

// Re-export key types at crate root for convenience.
pub use client::{ApiReply, Client};
pub use config::{Config, Credentials};
pub use error::IdeaCenterError;
pub use suite::{Scenario, ScenarioOutcome, SuiteContext, SuiteReport};
pub use types::{ApiResponse, IdeaRequest};
