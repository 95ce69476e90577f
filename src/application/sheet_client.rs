use std::{fmt::Debug, sync::Arc};

use tokio::sync::OnceCell;
use tracing::instrument;

use crate::ports::{
    load_error::LoadError,
    sheets_api::{SheetsApi, SheetsConnector},
};

/// Process-wide handle to the spreadsheet service.
///
/// The connection is built on the first [`SheetClient::acquire`] and shared by
/// every later call. A failed attempt is not remembered, the next call
/// connects again.
pub struct SheetClient {
    connector: Box<dyn SheetsConnector>,
    api: OnceCell<Arc<dyn SheetsApi>>,
}

impl Debug for SheetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetClient")
            .field("connected", &self.api.initialized())
            .finish()
    }
}

impl SheetClient {
    pub fn new(connector: impl SheetsConnector + 'static) -> Self {
        Self {
            connector: Box::new(connector),
            api: OnceCell::new(),
        }
    }

    #[instrument(name = "SheetClient::acquire")]
    pub async fn acquire(&self) -> error_stack::Result<Arc<dyn SheetsApi>, LoadError> {
        let api = self
            .api
            .get_or_try_init(|| async {
                tracing::info!("Connecting to the spreadsheet service");
                self.connector.connect().await
            })
            .await?;

        Ok(Arc::clone(api))
    }

    pub fn is_connected(&self) -> bool {
        self.api.initialized()
    }
}
