//! # VSMT Check Service
//!
//! HTTP service that validates incoming FHIR `Task` requests against a
//! terminology server ecosystem:
//! - resolves the Task focus to a `ValueSet` (contained or fetched remotely)
//! - resolves `instantiatesCanonical` to exactly one `ActivityDefinition`
//! - runs the named check against the resolved ValueSet
//! - reports structured issues as an `OperationOutcome`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vsmt_checks::{AppConfig, Server};
//!
//! # async fn example() -> vsmt_checks::Result<()> {
//! let config = AppConfig::default();
//! Server::new(config)?.start().await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod checks;
pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod resolve;
pub mod routes;
pub mod server;
pub mod state;
pub mod types;

pub use config::{AppConfig, BackendSettings};
pub use error::{CheckError, Result};
pub use pipeline::{TaskOutcome, ValidationPipeline};
pub use server::Server;
pub use state::AppState;
pub use types::*;
