//! Command line and environment configuration.

use crate::error::{ClinicError, Result};
use crate::llm::gateway::CompletionConfig;
use crate::llm::gateways::openai::{OpenAIConfig, DEFAULT_BASE_URL};
use crate::prompt::DEFAULT_CLINIC_NAME;
use crate::schedule::MatchMode;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Chat with the clinic's scheduling assistant from the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "clinic-chat", version, about)]
pub struct Settings {
    /// CSV file with the doctor roster and their slots
    #[arg(long, env = "CLINIC_SCHEDULE", default_value = "doctor_schedule.csv")]
    pub schedule: PathBuf,

    /// Chat model to use
    #[arg(long, env = "CLINIC_MODEL", default_value = "gpt-4o")]
    pub model: String,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_API_ENDPOINT", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// How requested times are compared against published slots
    #[arg(long, default_value_t = MatchMode::Structured)]
    pub match_mode: MatchMode,

    /// Rounds of tool calls allowed per turn before the model must answer
    #[arg(long, default_value_t = 1)]
    pub max_tool_rounds: usize,

    #[arg(long, default_value_t = 1.0)]
    pub temperature: f32,

    #[arg(long, default_value_t = 0)]
    pub seed: i64,

    /// HTTP timeout for model requests, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, default_value = DEFAULT_CLINIC_NAME)]
    pub clinic_name: String,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Settings {
    /// Gateway connection settings. Fails when no API key was given.
    pub fn openai_config(&self) -> Result<OpenAIConfig> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ClinicError::ConfigError(
                    "No API key: pass --api-key or set OPENAI_API_KEY".to_string(),
                )
            })?;

        Ok(OpenAIConfig {
            api_key: api_key.to_string(),
            base_url: self.base_url.trim_end_matches('/').to_string(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        })
    }

    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig {
            temperature: self.temperature,
            seed: Some(self.seed),
            ..Default::default()
        }
    }

    /// Log level used when `RUST_LOG` is not set
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
