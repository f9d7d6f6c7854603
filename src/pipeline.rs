use crate::cache::SnapshotLoader;
use crate::error::Result;
use crate::extract::extract_table;
use crate::fetcher::ListFetcher;
use crate::resolve::resolve_isin_column;
use crate::snapshot::Snapshot;
use crate::workbook::{select_sheet, PositiveListWorkbook};
use async_trait::async_trait;
use chrono::{Datelike, Local, Utc};
use std::sync::Arc;
use tracing::info;

/// The full load path: download the workbook, pick the active year sheet,
/// extract the table and resolve the ISIN column. One run produces one
/// immutable snapshot for the cache to hold.
pub struct PositiveListPipeline {
    fetcher: Arc<dyn ListFetcher>,
    url: String,
}

impl PositiveListPipeline {
    pub fn new(fetcher: Arc<dyn ListFetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait]
impl SnapshotLoader for PositiveListPipeline {
    async fn load(&self) -> Result<Snapshot> {
        let bytes = self.fetcher.fetch(&self.url).await?;

        let mut workbook = PositiveListWorkbook::open(bytes)?;
        info!("Sheets in workbook: {:?}", workbook.sheet_names());

        let sheet_name = select_sheet(workbook.sheet_names(), Local::now().year()).to_string();
        info!("Using sheet '{}'", sheet_name);

        let raw_rows = workbook.rows(&sheet_name)?;
        let table = extract_table(&raw_rows);
        let resolution = resolve_isin_column(&table.headers, &table.rows);
        info!(
            "Loaded {} data rows, ISIN column {:?}",
            table.rows.len(),
            resolution
        );

        Ok(Snapshot {
            sheet_name,
            headers: table.headers,
            rows: table.rows,
            isin_column: Some(resolution.index()),
            resolution,
            loaded_at: Utc::now(),
        })
    }
}
