use crate::cache::SnapshotCache;
use crate::error::{LookupError, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Result of one ISIN query. Zero matches is a successful answer; the header
/// list and total row count go along so callers can render context.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub isin: String,
    pub headers: Vec<String>,
    pub matches: Vec<Vec<String>>,
    pub total_rows: usize,
}

/// Result of a forced refresh.
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub ok: bool,
    pub rows: usize,
    pub isin_column: Option<usize>,
}

/// Answers ISIN queries against the cached snapshot.
pub struct LookupService {
    cache: Arc<SnapshotCache>,
}

impl LookupService {
    pub fn new(cache: Arc<SnapshotCache>) -> Self {
        Self { cache }
    }

    /// Exact-match lookup of `isin` in the current list. Input is trimmed and
    /// upper-cased before comparison; an empty identifier is rejected before
    /// the cache is touched.
    pub async fn search(&self, isin: &str) -> Result<SearchResponse> {
        let isin = isin.trim().to_uppercase();
        if isin.is_empty() {
            return Err(LookupError::MissingIsin);
        }

        let snapshot = self.cache.get().await?;
        let column = snapshot.isin_column.ok_or(LookupError::NoIsinColumn)?;

        let matches: Vec<Vec<String>> = snapshot
            .rows
            .iter()
            .filter(|row| {
                row.get(column)
                    .map_or(false, |cell| cell.to_uppercase() == isin)
            })
            .cloned()
            .collect();

        Ok(SearchResponse {
            isin,
            headers: snapshot.headers.clone(),
            matches,
            total_rows: snapshot.rows.len(),
        })
    }

    /// Drops the cached snapshot and loads a fresh one, for when Skat
    /// publishes an updated list.
    pub async fn reload(&self) -> Result<ReloadResponse> {
        self.cache.invalidate();
        let snapshot = self.cache.get().await?;
        info!("Reloaded positive list, {} rows", snapshot.rows.len());
        Ok(ReloadResponse {
            ok: true,
            rows: snapshot.rows.len(),
            isin_column: snapshot.isin_column,
        })
    }
}
