use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::{
    application::{
        cache::{CacheEntry, CacheKey, TtlCache},
        sheet_client::SheetClient,
    },
    domain::table::Table,
    ports::load_error::LoadError,
};

/// Default time a fetched worksheet stays valid.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Resolves worksheet names to [`Table`]s, keeping each result for the
/// cache TTL so that repeated renders do not hit the remote service.
#[derive(Debug)]
pub struct WorksheetLoader {
    client: Arc<SheetClient>,
    cache: TtlCache<Table>,
}

impl WorksheetLoader {
    pub fn new(client: Arc<SheetClient>, ttl: Duration) -> Self {
        Self {
            client,
            cache: TtlCache::new(ttl),
        }
    }

    pub fn client(&self) -> &SheetClient {
        &self.client
    }

    pub fn ttl(&self) -> Duration {
        self.cache.ttl()
    }

    /// Returns the worksheet as a table, from cache while the entry is fresh.
    ///
    /// On error the slot keeps whatever it held before, but an expired entry
    /// is never returned, so the next call fetches again.
    #[instrument(skip(self))]
    pub async fn load(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
    ) -> error_stack::Result<Arc<Table>, LoadError> {
        let key = CacheKey::new(spreadsheet_id, worksheet);
        let mut slot = self.cache.lock_slot(&key).await;

        match &*slot {
            Some(entry) if entry.is_fresh(self.cache.ttl()) => {
                tracing::debug!("Cache hit for '{}'", worksheet);
                return Ok(Arc::clone(entry.value()));
            }
            Some(_) => tracing::debug!("Cache entry for '{}' expired", worksheet),
            None => tracing::debug!("Cache miss for '{}'", worksheet),
        }

        let table = Arc::new(self.fetch(spreadsheet_id, worksheet).await?);
        *slot = Some(CacheEntry::new(Arc::clone(&table)));

        tracing::info!(
            "Loaded '{}': {} rows, {} columns",
            worksheet,
            table.row_count(),
            table.column_count()
        );
        Ok(table)
    }

    async fn fetch(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
    ) -> error_stack::Result<Table, LoadError> {
        let api = self.client.acquire().await?;
        let spreadsheet = api.open_spreadsheet(spreadsheet_id).await?;
        let handle = spreadsheet.worksheet(worksheet)?;
        let values = api.fetch_values(&handle).await?;

        Ok(Table::from_value_rows(values))
    }

    /// Wall-clock time of the cached fetch, if the entry is still fresh.
    pub async fn cached_at(&self, spreadsheet_id: &str, worksheet: &str) -> Option<DateTime<Utc>> {
        self.cache
            .fetched_at(&CacheKey::new(spreadsheet_id, worksheet))
            .await
    }

    pub async fn invalidate(&self, spreadsheet_id: &str, worksheet: &str) {
        self.cache
            .invalidate(&CacheKey::new(spreadsheet_id, worksheet))
            .await
    }

    pub async fn clear(&self) {
        self.cache.clear().await
    }
}
