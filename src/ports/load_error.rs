use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("authentication failed: {details}")]
    Authentication { details: String },
    #[error("could not reach the spreadsheet service")]
    Connectivity,
    #[error("spreadsheet '{spreadsheet_id}' not found or not shared with the service account")]
    SpreadsheetNotFound { spreadsheet_id: String },
    #[error("worksheet '{worksheet}' not found in spreadsheet")]
    WorksheetNotFound { worksheet: String },
    #[error("failed to fetch worksheet data")]
    Fetch,
}

impl LoadError {
    pub fn authentication<S: Into<String>>(details: S) -> Self {
        LoadError::Authentication {
            details: details.into(),
        }
    }
}
