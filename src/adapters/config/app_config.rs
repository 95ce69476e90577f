use config::Config;
use error_stack::{Report, ResultExt};
use thiserror::Error;

use super::sheets_config::SpreadsheetConfig;

const DEFAULT_CONFIG_PATH: &str = "Config";
const ENV_PREFIX: &str = "DASHBOARD";

fn default_refresh_interval_secs() -> u64 {
    60
}

/// Environment values always arrive as strings, so numeric settings accept
/// both `30` and `"30"`. String settings are never parsed, which keeps ids
/// such as `"0123"` intact.
pub(super) fn u64_from_number_or_str<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match <Raw as serde::Deserialize>::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct DashboardConfig {
    /// Seconds between renders in `watch` mode.
    #[serde(
        default = "default_refresh_interval_secs",
        deserialize_with = "u64_from_number_or_str"
    )]
    pub refresh_interval_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub sheets: SpreadsheetConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Error, Debug)]
pub enum AppConfigError {
    #[error("error reading config file '{path}'")]
    Read { path: String },
    #[error("invalid config at '{field}'")]
    Invalid { field: String },
}

impl AppConfig {
    /// Reads `Config.*` (or the file named by `CONFIG_PATH`) and overlays
    /// `DASHBOARD__SECTION__KEY` environment variables.
    pub fn load() -> error_stack::Result<Self, AppConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &str) -> error_stack::Result<Self, AppConfigError> {
        let config = Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX).separator("__"),
            )
            .build()
            .change_context_lazy(|| AppConfigError::Read {
                path: config_path.to_string(),
            })?;

        let value = config
            .try_deserialize::<serde_json::Value>()
            .change_context_lazy(|| AppConfigError::Read {
                path: config_path.to_string(),
            })?;

        Self::from_value(value)
    }

    fn from_value(value: serde_json::Value) -> error_stack::Result<Self, AppConfigError> {
        serde_path_to_error::deserialize(value).map_err(|e| {
            let field = e.path().to_string();
            let inner = e.into_inner();
            Report::new(inner)
                .change_context(AppConfigError::Invalid { field })
                .attach_printable(
                    "Make sure all required fields are present in the configuration file.",
                )
        })
    }
}

impl TryFrom<serde_json::Value> for AppConfig {
    type Error = Report<AppConfigError>;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}
