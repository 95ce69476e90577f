use error_stack::{report, Report, ResultExt};
use google_sheets4::oauth2::{self, authenticator::Authenticator};

use super::http_client::{HttpClient, HttpsConnector};
use crate::{adapters::config::sheets_config::SpreadsheetConfig, ports::load_error::LoadError};

/// Read-only access to spreadsheets.
pub const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

pub async fn auth(
    config: &SpreadsheetConfig,
    client: HttpClient,
) -> error_stack::Result<Authenticator<HttpsConnector>, LoadError> {
    let secret = service_account_key(config).await?;

    oauth2::ServiceAccountAuthenticator::with_client(secret, client)
        .build()
        .await
        .change_context(LoadError::authentication(
            "could not create an authenticator",
        ))
}

/// Fetches a first access token so that bad credentials surface here rather
/// than on the first worksheet read.
pub async fn verify(
    authenticator: &Authenticator<HttpsConnector>,
) -> error_stack::Result<(), LoadError> {
    authenticator
        .token(&[READONLY_SCOPE])
        .await
        .map(|_| ())
        .map_err(|error| {
            let context = match &error {
                oauth2::Error::HttpError(_) | oauth2::Error::LowLevelError(_) => {
                    LoadError::Connectivity
                }
                _ => LoadError::authentication("service account token request was rejected"),
            };
            Report::new(error).change_context(context)
        })
}

async fn service_account_key(
    config: &SpreadsheetConfig,
) -> error_stack::Result<oauth2::ServiceAccountKey, LoadError> {
    match (&config.service_account_json, &config.priv_key) {
        (Some(json), _) => oauth2::parse_service_account_key(json.as_bytes()).change_context(
            LoadError::authentication("inline service account key is not valid"),
        ),
        (None, Some(priv_key_path)) => {
            let priv_key_path: &str = priv_key_path;
            oauth2::read_service_account_key(priv_key_path)
                .await
                .change_context(LoadError::authentication(
                    "could not read service account private key",
                ))
                .attach_printable_lazy(|| format!("key path: {}", priv_key_path))
        }
        (None, None) => Err(report!(LoadError::authentication(
            "no service account key configured"
        ))
        .attach_printable("set sheets.priv_key or sheets.service_account_json")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(priv_key: Option<&str>, service_account_json: Option<&str>) -> SpreadsheetConfig {
        SpreadsheetConfig {
            spreadsheet_id: "id".into(),
            priv_key: priv_key.map(Into::into),
            service_account_json: service_account_json.map(Into::into),
            cache_ttl_secs: 3600,
        }
    }

    #[tokio::test]
    async fn test_missing_key_is_authentication_error() {
        let error = service_account_key(&config(None, None)).await.unwrap_err();
        assert!(matches!(
            error.current_context(),
            LoadError::Authentication { .. }
        ));
    }

    #[tokio::test]
    async fn test_unreadable_key_file_is_authentication_error() {
        let error = service_account_key(&config(Some("/nonexistent/key.json"), None))
            .await
            .unwrap_err();
        assert!(matches!(
            error.current_context(),
            LoadError::Authentication { .. }
        ));
    }

    #[tokio::test]
    async fn test_malformed_inline_key_is_authentication_error() {
        let error = service_account_key(&config(None, Some("{not json")))
            .await
            .unwrap_err();
        assert!(matches!(
            error.current_context(),
            LoadError::Authentication { .. }
        ));
    }
}
