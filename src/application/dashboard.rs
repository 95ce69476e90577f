use std::sync::Arc;

use tracing::{error, info, instrument, Instrument};

use crate::{
    application::worksheet_loader::WorksheetLoader,
    domain::{table::Table, worksheet::WorksheetName},
    ports::{
        dashboard_service::{DashboardService, TabOutcome},
        load_error::LoadError,
    },
};

/// The six-tab dashboard over one spreadsheet.
#[derive(Debug)]
pub struct SpreadsheetDashboard {
    spreadsheet_id: String,
    loader: WorksheetLoader,
}

impl SpreadsheetDashboard {
    pub fn new(spreadsheet_id: impl Into<String>, loader: WorksheetLoader) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            loader,
        }
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }
}

#[async_trait::async_trait]
impl DashboardService for SpreadsheetDashboard {
    #[instrument(skip(self))]
    async fn acquire_client(&self) -> error_stack::Result<(), LoadError> {
        self.loader.client().acquire().await.map(|_| ())
    }

    async fn load(&self, worksheet: WorksheetName) -> error_stack::Result<Arc<Table>, LoadError> {
        self.loader
            .load(&self.spreadsheet_id, worksheet.as_ref())
            .await
    }

    async fn load_tab(&self, worksheet: WorksheetName) -> TabOutcome {
        match self.load(worksheet).await {
            Ok(table) => {
                info!("✅ {}: {} rows", worksheet, table.row_count());
                TabOutcome {
                    worksheet,
                    table,
                    fetched_at: self
                        .loader
                        .cached_at(&self.spreadsheet_id, worksheet.as_ref())
                        .await,
                    error: None,
                }
            }
            Err(report) => {
                error!("❌ {}: {:?}", worksheet, report);
                TabOutcome {
                    worksheet,
                    table: Arc::new(Table::empty()),
                    fetched_at: None,
                    error: Some(report),
                }
            }
        }
    }

    #[instrument(skip(self))]
    async fn load_all(&self) -> error_stack::Result<Vec<TabOutcome>, LoadError> {
        self.acquire_client().await?;

        let worksheets = self.list_worksheets();
        let mut outcomes = Vec::with_capacity(worksheets.len());

        for (index, worksheet) in worksheets.iter().copied().enumerate() {
            let outcome = self
                .load_tab(worksheet)
                .instrument(tracing::span!(
                    tracing::Level::INFO,
                    "worksheet",
                    worksheet = worksheet.as_ref(),
                    index = index,
                    len = worksheets.len()
                ))
                .await;
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    async fn refresh(&self) {
        info!("Dropping cached worksheets");
        self.loader.clear().await
    }

    fn list_worksheets(&self) -> Vec<WorksheetName> {
        WorksheetName::all().collect()
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> error_stack::Result<String, LoadError> {
        let api = self.loader.client().acquire().await?;
        let spreadsheet = api.open_spreadsheet(&self.spreadsheet_id).await?;

        let missing: Vec<String> = self
            .list_worksheets()
            .into_iter()
            .filter(|w| spreadsheet.worksheet(w.as_ref()).is_err())
            .map(|w| w.to_string())
            .collect();

        let status = if missing.is_empty() {
            "🟢 GadgetHub Dashboard - Healthy"
        } else {
            "🟡 GadgetHub Dashboard - Degraded"
        };

        Ok(format!(
            "{}\n\
             Spreadsheet: {}\n\
             Worksheets found: {}\n\
             Missing worksheets: {}\n\
             Cache TTL: {}s",
            status,
            spreadsheet.spreadsheet_id(),
            spreadsheet.worksheet_titles().join(", "),
            if missing.is_empty() {
                "none".to_string()
            } else {
                missing.join(", ")
            },
            self.loader.ttl().as_secs()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::in_memory::{InMemoryConnector, InMemorySpreadsheet},
        application::{sheet_client::SheetClient, worksheet_loader::DEFAULT_TTL},
    };
    use serde_json::json;

    const SHEET_ID: &str = "gadgethub";

    fn full_spreadsheet() -> InMemorySpreadsheet {
        WorksheetName::all().fold(InMemorySpreadsheet::new(SHEET_ID), |sheet, worksheet| {
            sheet.with_worksheet(
                worksheet.as_ref(),
                vec![vec![json!("id")], vec![json!(worksheet.as_ref())]],
            )
        })
    }

    fn dashboard(connector: InMemoryConnector) -> SpreadsheetDashboard {
        let client = Arc::new(SheetClient::new(connector));
        SpreadsheetDashboard::new(SHEET_ID, WorksheetLoader::new(client, DEFAULT_TTL))
    }

    #[tokio::test]
    async fn test_load_all_returns_tabs_in_order() {
        let spreadsheet = full_spreadsheet();
        let dashboard = dashboard(InMemoryConnector::new(spreadsheet.clone()));

        let outcomes = dashboard.load_all().await.unwrap();

        let names: Vec<WorksheetName> = outcomes.iter().map(|o| o.worksheet).collect();
        assert_eq!(names, WorksheetName::all().collect::<Vec<_>>());
        assert!(outcomes.iter().all(TabOutcome::is_ok));
        assert!(outcomes.iter().all(|o| o.fetched_at.is_some()));
        assert_eq!(spreadsheet.total_fetches(), 6);
    }

    #[tokio::test]
    async fn test_missing_worksheet_degrades_only_its_tab() {
        let spreadsheet = full_spreadsheet();
        spreadsheet.remove_worksheet("Sales Reps");
        let dashboard = dashboard(InMemoryConnector::new(spreadsheet.clone()));

        let outcomes = dashboard.load_all().await.unwrap();

        for outcome in &outcomes {
            if outcome.worksheet == WorksheetName::SalesReps {
                assert!(!outcome.is_ok());
                assert_eq!(*outcome.table, Table::empty());
                assert!(outcome.fetched_at.is_none());
            } else {
                assert!(outcome.is_ok(), "{} should load", outcome.worksheet);
                assert_eq!(outcome.table.row_count(), 1);
                assert_eq!(
                    outcome.table.row(0).unwrap().get("id"),
                    Some(&json!(outcome.worksheet.as_ref()))
                );
            }
        }
    }

    #[tokio::test]
    async fn test_invalid_credentials_abort_before_any_load() {
        let spreadsheet = full_spreadsheet();
        let connector = InMemoryConnector::failing(
            spreadsheet.clone(),
            LoadError::authentication("invalid_grant"),
        );
        let dashboard = dashboard(connector.clone());

        let error = dashboard.load_all().await.unwrap_err();

        assert!(matches!(
            error.current_context(),
            LoadError::Authentication { .. }
        ));
        assert_eq!(connector.connect_count(), 1);
        assert_eq!(spreadsheet.total_fetches(), 0);
    }

    #[tokio::test]
    async fn test_second_pass_is_served_from_cache() {
        let spreadsheet = full_spreadsheet();
        let dashboard = dashboard(InMemoryConnector::new(spreadsheet.clone()));

        dashboard.load_all().await.unwrap();
        dashboard.load_all().await.unwrap();
        assert_eq!(spreadsheet.total_fetches(), 6);

        dashboard.refresh().await;
        dashboard.load_all().await.unwrap();
        assert_eq!(spreadsheet.total_fetches(), 12);
    }

    #[tokio::test]
    async fn test_health_check_lists_missing_worksheets() {
        let spreadsheet = full_spreadsheet();
        spreadsheet.remove_worksheet("KPI Settings");
        let dashboard = dashboard(InMemoryConnector::new(spreadsheet));

        let health = dashboard.health_check().await.unwrap();

        assert!(health.contains("Degraded"));
        assert!(health.contains("Missing worksheets: KPI Settings"));
    }

    #[tokio::test]
    async fn test_health_check_healthy() {
        let dashboard = dashboard(InMemoryConnector::new(full_spreadsheet()));

        let health = dashboard.health_check().await.unwrap();

        assert!(health.contains("Healthy"));
        assert!(health.contains("Missing worksheets: none"));
    }
}
