use std::sync::Arc;

use error_stack::report;
use serde_json::Value;

use super::load_error::LoadError;

/// An opened spreadsheet: its identifier and the titles of its worksheets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetHandle {
    spreadsheet_id: String,
    worksheet_titles: Vec<String>,
}

impl SpreadsheetHandle {
    pub fn new(spreadsheet_id: impl Into<String>, worksheet_titles: Vec<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            worksheet_titles,
        }
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn worksheet_titles(&self) -> &[String] {
        &self.worksheet_titles
    }

    /// Looks up a worksheet by its exact title.
    pub fn worksheet(&self, title: &str) -> error_stack::Result<WorksheetHandle, LoadError> {
        if !self.worksheet_titles.iter().any(|t| t == title) {
            return Err(report!(LoadError::WorksheetNotFound {
                worksheet: title.to_string(),
            })
            .attach_printable(format!(
                "available worksheets: {}",
                self.worksheet_titles.join(", ")
            )));
        }

        Ok(WorksheetHandle {
            spreadsheet_id: self.spreadsheet_id.clone(),
            title: title.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetHandle {
    spreadsheet_id: String,
    title: String,
}

impl WorksheetHandle {
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Read-only access to a remote spreadsheet service.
#[async_trait::async_trait]
pub trait SheetsApi: Send + Sync {
    async fn open_spreadsheet(
        &self,
        spreadsheet_id: &str,
    ) -> error_stack::Result<SpreadsheetHandle, LoadError>;

    /// Every populated row of the worksheet, header row first.
    async fn fetch_values(
        &self,
        worksheet: &WorksheetHandle,
    ) -> error_stack::Result<Vec<Vec<Value>>, LoadError>;
}

/// Builds an authenticated [`SheetsApi`]. Expected to be slow (credential
/// handshake), so callers hold on to the result.
#[async_trait::async_trait]
pub trait SheetsConnector: Send + Sync {
    async fn connect(&self) -> error_stack::Result<Arc<dyn SheetsApi>, LoadError>;
}
