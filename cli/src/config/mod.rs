//! Configuration management for the fitlog CLI
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. An explicit `--config` file
//! 4. Environment variables (prefix: FITLOG__)

use anyhow::{Context, Result};
use fitlog_shared::calendar::CalendarSettings;
use fitlog_shared::dashboard::DashboardConfig;
use fitlog_shared::CalorieSettings;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Environment variable selecting the config profile
pub const ENV_VAR: &str = "FITLOG_ENV";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub calories: CalorieSettings,
    #[serde(default)]
    pub calendar: CalendarSettings,
    #[serde(default)]
    pub dashboard: DashboardSection,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dashboard layout
///
/// Stored snake_case here; [`DashboardConfig`] itself serializes camelCase
/// for the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSection {
    pub selected_widgets: Vec<String>,
    pub max_widgets: usize,
}

impl Default for DashboardSection {
    fn default() -> Self {
        let defaults = DashboardConfig::default();
        Self {
            selected_widgets: defaults.selected_widgets,
            max_widgets: defaults.max_widgets,
        }
    }
}

impl From<&DashboardSection> for DashboardConfig {
    fn from(section: &DashboardSection) -> Self {
        DashboardConfig {
            selected_widgets: section.selected_widgets.clone(),
            max_widgets: section.max_widgets,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        if AppConfig::is_production() {
            Self {
                format: LogFormat::Json,
                filter: "fitlog_cli=info,fitlog_shared=info".to_string(),
            }
        } else {
            Self {
                format: LogFormat::Pretty,
                filter: "fitlog_cli=info,fitlog_shared=warn".to_string(),
            }
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on FITLOG_ENV (development.toml or production.toml)
    /// 3. `config_path`, which must exist when given
    /// 4. Environment variables with FITLOG__ prefix
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let profile_file = format!("config/{}.toml", Self::environment());

        let mut builder = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&profile_file).required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::from(path));
        }

        // e.g., FITLOG__CALORIES__DEFAULT_BODY_WEIGHT_KG=80 sets calories.default_body_weight_kg
        let config = builder
            .add_source(config::Environment::with_prefix("FITLOG").separator("__"))
            .build()
            .with_context(|| match config_path {
                Some(path) => format!("failed to load config from {}", path.display()),
                None => "failed to load config".to_string(),
            })?;

        Ok(config.try_deserialize()?)
    }

    /// Active profile name, `development` unless FITLOG_ENV says otherwise
    pub fn environment() -> String {
        env::var(ENV_VAR).unwrap_or_else(|_| "development".to_string())
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        Self::environment() == "production"
    }

    pub fn dashboard_config(&self) -> DashboardConfig {
        DashboardConfig::from(&self.dashboard)
    }
}
