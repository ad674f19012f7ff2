//! Configuration module for the engagement engine
//!
//! This module handles loading and validating configuration from environment
//! variables, providing strongly-typed configuration structures for the
//! report binary.

use envconfig::Envconfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::ranking::SortStrategy;

const ENVIRONMENTS: [&str; 3] = ["development", "staging", "production"];

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct Config {
    /// Application configuration
    #[serde(flatten)]
    #[envconfig(nested = true)]
    pub app: AppConfig,

    /// Pipeline configuration
    #[serde(flatten)]
    #[envconfig(nested = true)]
    pub pipeline: PipelineConfig,

    /// Report configuration
    #[serde(flatten)]
    #[envconfig(nested = true)]
    pub report: ReportConfig,
}

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct AppConfig {
    /// Log level
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,

    /// Environment (development, staging, production)
    #[envconfig(from = "ENVIRONMENT", default = "development")]
    pub environment: String,
}

impl AppConfig {
    /// Check if running in development mode
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct PipelineConfig {
    /// JSON Lines file holding the interaction records
    #[envconfig(from = "INPUT_PATH", default = "data/interactions.jsonl")]
    pub input_path: String,

    /// Ranking sort algorithm (quick, merge, bubble)
    #[envconfig(from = "SORT_STRATEGY", default = "quick")]
    pub sort_strategy: String,
}

impl PipelineConfig {
    pub fn input_path(&self) -> PathBuf {
        PathBuf::from(&self.input_path)
    }
}

/// Report configuration
#[derive(Debug, Clone, Deserialize, Serialize, Envconfig)]
pub struct ReportConfig {
    /// Truncate every ranking to this many rows
    #[envconfig(from = "REPORT_TOP_N")]
    pub top_n: Option<usize>,

    /// Also list the comments of this content item
    #[envconfig(from = "REPORT_COMMENTS_CONTENT_ID")]
    pub comments_content_id: Option<i64>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenv::dotenv().ok();

        // Parse configuration from environment
        Config::init_from_env().map_err(Error::from)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !ENVIRONMENTS.contains(&self.app.environment.as_str()) {
            return Err(Error::config(format!(
                "Unknown environment '{}' (expected one of: {})",
                self.app.environment,
                ENVIRONMENTS.join(", ")
            )));
        }

        self.sort_strategy()?;

        if self.report.top_n == Some(0) {
            return Err(Error::config("REPORT_TOP_N must be at least 1"));
        }

        Ok(())
    }

    /// Parsed sort strategy
    pub fn sort_strategy(&self) -> Result<SortStrategy> {
        self.pipeline.sort_strategy.parse()
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!(
            environment = %self.app.environment,
            log_level = %self.app.log_level,
            "Application configuration"
        );

        tracing::info!(
            input_path = %self.pipeline.input_path,
            sort_strategy = %self.pipeline.sort_strategy,
            "Pipeline configuration"
        );

        tracing::info!(
            top_n = ?self.report.top_n,
            comments_content_id = ?self.report.comments_content_id,
            "Report configuration"
        );
    }
}
