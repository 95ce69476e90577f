use std::sync::Arc;

use chrono::{DateTime, Utc};
use error_stack::Report;

use super::load_error::LoadError;
use crate::domain::{table::Table, worksheet::WorksheetName};

/// What one dashboard tab shows after a rendering pass.
#[derive(Debug)]
pub struct TabOutcome {
    pub worksheet: WorksheetName,
    pub table: Arc<Table>,
    pub fetched_at: Option<DateTime<Utc>>,
    /// Set when the worksheet could not be loaded; `table` is then empty.
    pub error: Option<Report<LoadError>>,
}

impl TabOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[async_trait::async_trait]
pub trait DashboardService: Send + Sync {
    /// Makes sure the spreadsheet service is reachable with the configured
    /// credentials.
    async fn acquire_client(&self) -> error_stack::Result<(), LoadError>;

    async fn load(&self, worksheet: WorksheetName) -> error_stack::Result<Arc<Table>, LoadError>;

    /// Loads one tab, degrading to an empty table if the worksheet cannot be
    /// read.
    async fn load_tab(&self, worksheet: WorksheetName) -> TabOutcome;

    /// Loads every tab in order. Only client failures abort the pass, a tab
    /// that fails to load comes back empty with its error attached.
    async fn load_all(&self) -> error_stack::Result<Vec<TabOutcome>, LoadError>;

    /// Drops every cached worksheet.
    async fn refresh(&self);

    fn list_worksheets(&self) -> Vec<WorksheetName>;

    async fn health_check(&self) -> error_stack::Result<String, LoadError>;
}
