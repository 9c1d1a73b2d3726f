use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "AIDD_ENV";
pub const CONFIG_DIR_ENV: &str = "AIDD_CONFIG_DIR";

/// Deployment environment the bootstrap is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and environment overlay.
    ///
    /// `config_dir` takes precedence over `AIDD_CONFIG_DIR`; without either the
    /// `config` directory under the working directory is used.
    pub fn load(config_dir: Option<&Path>) -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let environment = Environment::parse(&environment)?;

        let config_dir = match config_dir {
            Some(dir) => dir.to_path_buf(),
            None => match std::env::var(CONFIG_DIR_ENV) {
                Ok(dir) => PathBuf::from(dir),
                Err(_) => std::env::current_dir()
                    .map(|cwd| cwd.join("config"))
                    .with_context(|| "unable to resolve current directory")?,
            },
        };

        let mut settings = Self::from_dir(&config_dir, &environment, env_source())?;
        settings.environment = environment;
        Ok(settings)
    }

    fn from_dir(
        config_dir: &Path,
        environment: &Environment,
        env: config::Environment,
    ) -> anyhow::Result<Self> {
        let base_path = config_dir.join("base.toml");
        let environment_filename = format!("{}.toml", environment.as_str());
        let environment_path = config_dir.join(environment_filename);

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(env);

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        cfg.try_deserialize()
            .with_context(|| "failed to deserialize configuration")
    }
}

/// `AIDD_` prefixed variables, `__` between nested keys (`AIDD_DATABASE__URI`).
fn env_source() -> config::Environment {
    config::Environment::with_prefix("AIDD")
        .prefix_separator("_")
        .separator("__")
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "DatabaseSettings::default_uri")]
    pub uri: String,
    #[serde(default = "DatabaseSettings::default_app_name")]
    pub app_name: String,
    #[serde(default = "DatabaseSettings::default_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "DatabaseSettings::default_timeout_ms")]
    pub server_selection_timeout_ms: u64,
}

impl DatabaseSettings {
    fn default_uri() -> String {
        "mongodb://127.0.0.1:27017".to_string()
    }

    fn default_app_name() -> String {
        "aidd-init".to_string()
    }

    fn default_timeout_ms() -> u64 {
        10_000
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            uri: Self::default_uri(),
            app_name: Self::default_app_name(),
            connect_timeout_ms: Self::default_timeout_ms(),
            server_selection_timeout_ms: Self::default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// Fallback filter directive when `RUST_LOG` is unset.
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
