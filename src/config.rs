//! Service configuration management

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::error::{CheckError, Result};

/// Top-level service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Downstream server connections
    #[serde(default)]
    pub checks: ChecksConfig,

    /// Logging settings
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request and outbound call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

/// One configuration set per downstream server
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChecksConfig {
    /// Data (FHIR) server resolving remote focus references
    #[serde(default)]
    pub fhir_server: BackendSettings,

    /// Terminology server answering canonical searches
    #[serde(default)]
    pub terminology_server: BackendSettings,
}

/// Connection settings for one downstream FHIR-speaking server
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendSettings {
    /// Base endpoint for resource reads and searches
    #[serde(default)]
    pub endpoint: String,

    /// Token endpoint for the client-credentials grant
    #[serde(default)]
    pub auth_endpoint: String,

    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Log level when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "vsmt-checks-server")]
#[command(about = "Terminology Task check service")]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, env = "CONFIG_FILE_PATH")]
    pub config: Option<PathBuf>,

    /// Server host
    #[arg(long, env = "VSMT_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(short, long, env = "VSMT_PORT")]
    pub port: Option<u16>,

    /// Log level
    #[arg(long, env = "RUST_LOG")]
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Load configuration from defaults, file, environment, and arguments
    pub fn load(args: &Args) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Load default configuration
        builder = builder.add_source(config::Config::try_from(&Self::default())?);

        // Load from configuration file if provided
        if let Some(config_path) = &args.config {
            builder = builder.add_source(config::File::from(config_path.clone()));
        }

        // Override with environment variables
        builder = builder.add_source(
            config::Environment::with_prefix("VSMT")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: AppConfig = builder.build()?.try_deserialize()?;

        // Override with command line arguments
        if let Some(host) = &args.host {
            config.server.host = host.clone();
        }
        if let Some(port) = args.port {
            config.server.port = port;
        }
        if let Some(log_level) = &args.log_level {
            config.monitoring.log_level = log_level.clone();
        }

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(config_error("Server port must be greater than 0"));
        }

        validate_backend("checks.fhir_server", &self.checks.fhir_server)?;
        validate_backend("checks.terminology_server", &self.checks.terminology_server)?;

        Ok(())
    }
}

fn validate_backend(name: &str, settings: &BackendSettings) -> Result<()> {
    if settings.endpoint.is_empty() {
        return Err(config_error(format!("{name}.endpoint is required")));
    }
    if Url::parse(&settings.endpoint).is_err() {
        return Err(config_error(format!("{name}.endpoint is not a valid URL")));
    }
    if settings.auth_endpoint.is_empty() {
        return Err(config_error(format!("{name}.auth_endpoint is required")));
    }
    if Url::parse(&settings.auth_endpoint).is_err() {
        return Err(config_error(format!(
            "{name}.auth_endpoint is not a valid URL"
        )));
    }
    Ok(())
}

fn config_error(message: impl Into<String>) -> CheckError {
    CheckError::Config(config::ConfigError::Message(message.into()))
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout: default_timeout(),
            max_body_size: default_max_body_size(),
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8085
}
fn default_timeout() -> u64 {
    30
}
fn default_max_body_size() -> usize {
    2 * 1024 * 1024 // 2MB
}
fn default_log_level() -> String {
    "info".to_string()
}
