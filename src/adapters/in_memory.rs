use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

use error_stack::report;
use serde_json::Value;

use crate::ports::{
    load_error::LoadError,
    sheets_api::{SheetsApi, SheetsConnector, SpreadsheetHandle, WorksheetHandle},
};

/// A spreadsheet held in memory. Clones share the same data, so a test can
/// keep one clone to edit worksheets and inspect fetch counts while the
/// loader reads through another.
#[derive(Debug, Clone)]
pub struct InMemorySpreadsheet {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug)]
struct Inner {
    spreadsheet_id: String,
    worksheets: Vec<(String, Vec<Vec<Value>>)>,
    fetch_counts: HashMap<String, usize>,
}

impl InMemorySpreadsheet {
    pub fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                spreadsheet_id: spreadsheet_id.into(),
                worksheets: Vec::new(),
                fetch_counts: HashMap::new(),
            })),
        }
    }

    pub fn with_worksheet(self, title: impl Into<String>, values: Vec<Vec<Value>>) -> Self {
        self.set_worksheet(title, values);
        self
    }

    /// Adds the worksheet, or replaces its contents if it already exists.
    pub fn set_worksheet(&self, title: impl Into<String>, values: Vec<Vec<Value>>) {
        let title = title.into();
        let mut inner = self.lock();
        match inner.worksheets.iter_mut().find(|(t, _)| *t == title) {
            Some((_, existing)) => *existing = values,
            None => inner.worksheets.push((title, values)),
        }
    }

    pub fn remove_worksheet(&self, title: &str) {
        self.lock().worksheets.retain(|(t, _)| t != title);
    }

    /// Number of times the values of `title` were read.
    pub fn fetch_count(&self, title: &str) -> usize {
        self.lock().fetch_counts.get(title).copied().unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.lock().fetch_counts.values().sum()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl SheetsApi for InMemorySpreadsheet {
    async fn open_spreadsheet(
        &self,
        spreadsheet_id: &str,
    ) -> error_stack::Result<SpreadsheetHandle, LoadError> {
        let inner = self.lock();
        if inner.spreadsheet_id != spreadsheet_id {
            return Err(report!(LoadError::SpreadsheetNotFound {
                spreadsheet_id: spreadsheet_id.to_string(),
            }));
        }

        Ok(SpreadsheetHandle::new(
            spreadsheet_id,
            inner.worksheets.iter().map(|(t, _)| t.clone()).collect(),
        ))
    }

    async fn fetch_values(
        &self,
        worksheet: &WorksheetHandle,
    ) -> error_stack::Result<Vec<Vec<Value>>, LoadError> {
        let mut inner = self.lock();
        let values = inner
            .worksheets
            .iter()
            .find(|(t, _)| t == worksheet.title())
            .map(|(_, values)| values.clone())
            .ok_or_else(|| {
                report!(LoadError::WorksheetNotFound {
                    worksheet: worksheet.title().to_string(),
                })
            })?;

        *inner
            .fetch_counts
            .entry(worksheet.title().to_string())
            .or_insert(0) += 1;
        Ok(values)
    }
}

/// Hands out an [`InMemorySpreadsheet`], or fails every connection attempt
/// with a fixed error.
#[derive(Debug, Clone)]
pub struct InMemoryConnector {
    spreadsheet: InMemorySpreadsheet,
    failure: Option<LoadError>,
    connects: Arc<AtomicUsize>,
}

impl InMemoryConnector {
    pub fn new(spreadsheet: InMemorySpreadsheet) -> Self {
        Self {
            spreadsheet,
            failure: None,
            connects: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(spreadsheet: InMemorySpreadsheet, failure: LoadError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::new(spreadsheet)
        }
    }

    /// Connection attempts made so far, failed ones included. Shared between
    /// clones.
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SheetsConnector for InMemoryConnector {
    async fn connect(&self) -> error_stack::Result<Arc<dyn SheetsApi>, LoadError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(failure) => Err(report!(failure.clone())),
            None => Ok(Arc::new(self.spreadsheet.clone())),
        }
    }
}
