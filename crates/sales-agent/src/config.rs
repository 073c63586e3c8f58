//! Command-line and environment configuration.

use std::env;
use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use sales_agent_core::appointment::DEFAULT_APPOINTMENTS_DIR;
use sales_agent_core::persona::{DEFAULT_PERSONA_NAME, Persona, PersonaStyle};
use sales_agent_openai_model::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAIConfig, OpenAIConfigBuilder,
};

/// The environment variable holding the API credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Command-line options. Every option falls back to an environment variable.
#[derive(Parser, Clone, Debug, PartialEq, Eq)]
#[command(name = "sales-agent", version, about = "A car sales assistant")]
pub struct Cli {
    /// CSV file with the vehicle inventory
    #[arg(
        long,
        env = "SALES_AGENT_INVENTORY",
        value_name = "PATH",
        default_value = "cars.csv"
    )]
    pub inventory: PathBuf,

    /// Directory where appointments are written
    #[arg(
        long,
        env = "SALES_AGENT_APPOINTMENTS_DIR",
        value_name = "DIR",
        default_value = DEFAULT_APPOINTMENTS_DIR
    )]
    pub appointments_dir: PathBuf,

    /// Chat model name
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(
        long,
        env = "OPENAI_BASE_URL",
        value_name = "URL",
        default_value = DEFAULT_BASE_URL
    )]
    pub base_url: String,

    /// Name the salesperson introduces itself with
    #[arg(
        long,
        env = "SALES_AGENT_PERSONA_NAME",
        value_name = "NAME",
        default_value = DEFAULT_PERSONA_NAME
    )]
    pub persona_name: String,

    /// Prompt style: concise or deliberative
    #[arg(
        long,
        env = "SALES_AGENT_PERSONA_STYLE",
        value_name = "STYLE",
        default_value_t = PersonaStyle::default()
    )]
    pub persona_style: PersonaStyle,

    /// Seconds to wait for each model reply
    #[arg(
        long,
        env = "SALES_AGENT_TIMEOUT_SECS",
        value_name = "N",
        default_value_t = 60
    )]
    pub timeout_secs: u64,
}

/// Invalid or missing configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The API key is unset or blank.
    MissingApiKey,
    /// The request timeout is zero.
    InvalidTimeout,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingApiKey => {
                write!(f, "{API_KEY_ENV} environment variable is not set")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "request timeout must be greater than zero")
            }
        }
    }
}

impl StdError for ConfigError {}

/// Everything the binary needs to start a conversation.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Where the inventory is loaded from.
    pub inventory_path: PathBuf,
    /// Where appointments are written.
    pub appointments_dir: PathBuf,
    /// The salesperson persona.
    pub persona: Persona,
    /// Provider configuration, including the credential.
    pub openai: OpenAIConfig,
    /// Upper bound for each model request.
    pub request_timeout: Duration,
}

impl Settings {
    /// Resolves the settings from parsed options and the process
    /// environment.
    #[inline]
    pub fn from_env(cli: Cli) -> Result<Self, ConfigError> {
        Self::resolve(cli, env::var(API_KEY_ENV).ok())
    }

    /// Resolves the settings from parsed options and an explicit API key.
    pub fn resolve(
        cli: Cli,
        api_key: Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = api_key
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        if cli.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        let request_timeout = Duration::from_secs(cli.timeout_secs);

        let openai = OpenAIConfigBuilder::with_api_key(api_key)
            .with_model(cli.model)
            .with_base_url(cli.base_url)
            .with_timeout(request_timeout)
            .build();
        debug!("model: {}, base url: {}", openai.model(), openai.base_url());

        Ok(Self {
            inventory_path: cli.inventory,
            appointments_dir: cli.appointments_dir,
            persona: Persona::new(cli.persona_name, cli.persona_style),
            openai,
            request_timeout,
        })
    }
}
