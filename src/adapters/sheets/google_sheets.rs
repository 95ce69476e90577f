use std::{fmt::Debug, sync::Arc};

use error_stack::{report, Report};
use google_sheets4::{Error as Sheets4Error, Sheets};
use serde_json::Value;
use tracing::instrument;

use super::{
    a1_notation::A1Notation,
    auth::{self, READONLY_SCOPE},
    http_client::{self, HttpsConnector},
};
use crate::{
    adapters::config::sheets_config::SpreadsheetConfig,
    ports::{
        load_error::LoadError,
        sheets_api::{SheetsApi, SheetsConnector, SpreadsheetHandle, WorksheetHandle},
    },
};

/// Google Sheets API v4 client authenticated with a service account.
pub struct GoogleSheets {
    hub: Sheets<HttpsConnector>,
}

impl Debug for GoogleSheets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GoogleSheets")
    }
}

impl GoogleSheets {
    #[instrument(name = "GoogleSheets::connect")]
    pub async fn connect(config: &SpreadsheetConfig) -> error_stack::Result<Self, LoadError> {
        let client = http_client::http_client()?;
        let authenticator = auth::auth(config, client.clone()).await?;
        auth::verify(&authenticator).await?;

        Ok(GoogleSheets {
            hub: Sheets::new(client, authenticator),
        })
    }
}

#[async_trait::async_trait]
impl SheetsApi for GoogleSheets {
    #[instrument(skip(self))]
    async fn open_spreadsheet(
        &self,
        spreadsheet_id: &str,
    ) -> error_stack::Result<SpreadsheetHandle, LoadError> {
        let (_, spreadsheet) = self
            .hub
            .spreadsheets()
            .get(spreadsheet_id)
            .param("fields", "sheets.properties.title")
            .add_scope(READONLY_SCOPE)
            .doit()
            .await
            .map_err(|error| {
                into_report(
                    error,
                    LoadError::SpreadsheetNotFound {
                        spreadsheet_id: spreadsheet_id.to_string(),
                    },
                )
            })?;

        let titles = spreadsheet
            .sheets
            .ok_or_else(|| {
                report!(LoadError::Fetch).attach_printable("sheets not present in spreadsheet response")
            })?
            .into_iter()
            .filter_map(|sheet| sheet.properties.and_then(|p| p.title))
            .collect();

        Ok(SpreadsheetHandle::new(spreadsheet_id, titles))
    }

    #[instrument(skip(self))]
    async fn fetch_values(
        &self,
        worksheet: &WorksheetHandle,
    ) -> error_stack::Result<Vec<Vec<Value>>, LoadError> {
        let range = A1Notation::whole_sheet(worksheet.title());
        let (_, value_range) = self
            .hub
            .spreadsheets()
            .values_get(worksheet.spreadsheet_id(), range.as_ref())
            .major_dimension("ROWS")
            .value_render_option("FORMATTED_VALUE")
            .add_scope(READONLY_SCOPE)
            .doit()
            .await
            .map_err(|error| {
                into_report(
                    error,
                    LoadError::WorksheetNotFound {
                        worksheet: worksheet.title().to_string(),
                    },
                )
                .attach_printable(format!("range: {}", range))
            })?;

        // An empty worksheet comes back without `values`.
        Ok(value_range.values.unwrap_or_default())
    }
}

/// Connects to Google Sheets with the configured service account.
#[derive(Debug, Clone)]
pub struct GoogleSheetsConnector {
    config: SpreadsheetConfig,
}

impl GoogleSheetsConnector {
    pub fn new(config: SpreadsheetConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl SheetsConnector for GoogleSheetsConnector {
    async fn connect(&self) -> error_stack::Result<Arc<dyn SheetsApi>, LoadError> {
        let sheets = GoogleSheets::connect(&self.config).await?;
        Ok(Arc::new(sheets))
    }
}

fn into_report(error: Sheets4Error, not_found: LoadError) -> Report<LoadError> {
    let context = classify(&error, not_found);
    Report::new(error).change_context(context)
}

/// Maps a failed API call onto the load error taxonomy. `not_found` is used
/// for 400/403/404 answers, whose meaning depends on what was requested.
fn classify(error: &Sheets4Error, not_found: LoadError) -> LoadError {
    match error {
        Sheets4Error::HttpError(_) => LoadError::Connectivity,
        Sheets4Error::MissingToken(_) | Sheets4Error::MissingAPIKey => {
            LoadError::authentication("no access token available")
        }
        Sheets4Error::BadRequest(body) => classify_status(error_code(body), not_found),
        Sheets4Error::Failure(response) => {
            classify_status(Some(response.status().as_u16()), not_found)
        }
        _ => LoadError::Fetch,
    }
}

fn classify_status(status: Option<u16>, not_found: LoadError) -> LoadError {
    match status {
        Some(401) => LoadError::authentication("request was not authorized"),
        Some(400) | Some(403) | Some(404) => not_found,
        _ => LoadError::Fetch,
    }
}

fn error_code(body: &Value) -> Option<u16> {
    body.get("error")
        .and_then(|e| e.get("code"))
        .and_then(Value::as_u64)
        .and_then(|code| u16::try_from(code).ok())
}
