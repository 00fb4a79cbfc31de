use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for contact-intake
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IntakeConfig {
    /// Import platform API settings
    pub platform: PlatformConfig,
    /// Reference spreadsheet settings
    pub reference: ReferenceConfig,
    /// Submission sink settings
    pub submission: SubmissionConfig,
    /// Ingestion validation settings
    pub validation: ValidationConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlatformConfig {
    /// Base URL of the import platform REST API
    pub api_base: String,
    /// Platform API token (can be set via env var)
    pub token: Option<String>,
    /// Workbook name used during space provisioning
    pub workbook_name: String,
    /// Rate limiting settings
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Requests per second limit
    pub requests_per_second: u32,
    /// Burst capacity
    pub burst_capacity: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReferenceConfig {
    /// Base URL of the spreadsheet values API
    pub api_base: String,
    /// OAuth token exchange endpoint
    pub token_url: String,
    /// Cell range holding the reference email column
    pub range: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmissionConfig {
    /// URL that receives the submitted records
    pub endpoint_url: String,
    /// Page size for record fetches during submission
    pub page_size: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationConfig {
    /// Records per validation batch
    pub chunk_size: usize,
    /// Number of batches validated concurrently
    pub parallel_batches: usize,
    /// What to do when a batch cannot be validated
    pub on_failure: FailurePolicy,
}

/// Policy applied when a validation batch fails before any record was checked.
///
/// `DegradeGracefully` logs the error and lets the batch through unvalidated,
/// keeping the ingestion path available. `FailFast` propagates the error to
/// the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    DegradeGracefully,
    FailFast,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Enable structured tracing output
    pub tracing_enabled: bool,
    /// Log level
    pub log_level: String,
    /// Enable metrics collection
    pub metrics_enabled: bool,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            platform: PlatformConfig {
                api_base: "https://platform.example.com/api/v1".to_string(),
                token: None, // Will be read from env var
                workbook_name: "Workbook One".to_string(),
                rate_limit: RateLimitConfig {
                    requests_per_second: 10,
                    burst_capacity: 20,
                },
            },
            reference: ReferenceConfig {
                api_base: "https://sheets.googleapis.com".to_string(),
                token_url: "https://oauth2.googleapis.com/token".to_string(),
                range: "Sheet1!C:C".to_string(),
            },
            submission: SubmissionConfig {
                endpoint_url: "https://sink.example.com/intake".to_string(),
                page_size: 10_000,
            },
            validation: ValidationConfig {
                chunk_size: 100,
                parallel_batches: 2,
                on_failure: FailurePolicy::DegradeGracefully,
            },
            observability: ObservabilityConfig {
                tracing_enabled: true,
                log_level: "info".to_string(),
                metrics_enabled: true,
            },
        }
    }
}

impl IntakeConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (contact-intake.toml)
    /// 3. Environment variables (prefixed with CONTACT_INTAKE_)
    pub fn load() -> Result<Self> {
        let defaults = Config::try_from(&IntakeConfig::default())?;
        let mut builder = Config::builder().add_source(defaults);

        if Path::new("contact-intake.toml").exists() {
            builder = builder.add_source(File::with_name("contact-intake"));
        }

        // Override with environment variables
        builder = builder.add_source(
            Environment::with_prefix("CONTACT_INTAKE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut intake_config: IntakeConfig = config.try_deserialize()?;

        // Special handling for the platform token - check multiple sources
        if intake_config.platform.token.is_none() {
            if let Ok(token) = std::env::var("PLATFORM_API_TOKEN") {
                intake_config.platform.token = Some(token);
            } else if let Ok(token) = std::env::var("CONTACT_INTAKE_PLATFORM_TOKEN") {
                intake_config.platform.token = Some(token);
            }
        }

        Ok(intake_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<IntakeConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = IntakeConfig::load_env_file();
        IntakeConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static IntakeConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}
