use std::fmt::Debug;

use super::app_config::u64_from_number_or_str;

fn default_cache_ttl_secs() -> u64 {
    60 * 60
}

#[derive(serde::Deserialize, Clone)]
pub struct SpreadsheetConfig {
    pub spreadsheet_id: Box<str>,
    /// Path to a service account key file.
    #[serde(default)]
    pub priv_key: Option<Box<str>>,
    /// Inline service account key, takes precedence over `priv_key`.
    #[serde(default)]
    pub service_account_json: Option<Box<str>>,
    #[serde(
        default = "default_cache_ttl_secs",
        deserialize_with = "u64_from_number_or_str"
    )]
    pub cache_ttl_secs: u64,
}

impl Debug for SpreadsheetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpreadsheetConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("priv_key", &self.priv_key)
            .field(
                "service_account_json",
                &self.service_account_json.as_ref().map(|_| "<redacted>"),
            )
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .finish()
    }
}

impl SpreadsheetConfig {
    pub fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache_ttl_secs)
    }
}
