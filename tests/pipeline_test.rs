use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use positivliste::cache::SnapshotCache;
use positivliste::error::{LookupError, Result};
use positivliste::fetcher::ListFetcher;
use positivliste::pipeline::PositiveListPipeline;
use positivliste::resolve::ColumnResolution;
use positivliste::service::LookupService;

/// A trimmed-down edition of the published workbook: a guidance tab followed
/// by a year tab with preamble rows, a header row, and a blank spacer row.
const FIXTURE: &[u8] = include_bytes!("fixtures/positivliste.xlsx");

struct CountingFetcher {
    payload: Vec<u8>,
    calls: AtomicUsize,
}

impl CountingFetcher {
    fn new(payload: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            payload: payload.to_vec(),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListFetcher for CountingFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Yield so concurrent callers can pile up behind the cache's load lock.
        tokio::task::yield_now().await;
        Ok(self.payload.clone())
    }
}

fn build_service(fetcher: Arc<CountingFetcher>) -> (LookupService, Arc<SnapshotCache>) {
    let pipeline = PositiveListPipeline::new(fetcher, "https://example.test/liste.xlsx");
    let cache = Arc::new(SnapshotCache::new(Arc::new(pipeline)));
    (LookupService::new(Arc::clone(&cache)), cache)
}

#[tokio::test]
async fn end_to_end_search_finds_all_matching_rows() -> anyhow::Result<()> {
    let fetcher = CountingFetcher::new(FIXTURE);
    let (service, _) = build_service(Arc::clone(&fetcher));

    let response = service.search("dk0060534915").await?;

    assert_eq!(response.isin, "DK0060534915");
    assert_eq!(response.headers, vec!["Navn", "ISIN-kode", "Land", "Dato"]);
    // The blank spacer row is gone; Alpha, Beta and Gamma remain.
    assert_eq!(response.total_rows, 3);
    assert_eq!(response.matches.len(), 2);
    assert_eq!(response.matches[0][0], "Fond Alpha");
    assert_eq!(response.matches[1][0], "Fond Gamma");
    assert_eq!(fetcher.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn pipeline_resolves_the_isin_column_from_its_header() {
    let fetcher = CountingFetcher::new(FIXTURE);
    let (_, cache) = build_service(Arc::clone(&fetcher));

    let snapshot = cache.get().await.unwrap();
    assert_eq!(snapshot.sheet_name, "2026");
    assert_eq!(snapshot.resolution, ColumnResolution::ByHeader(1));
    assert_eq!(snapshot.isin_column, Some(1));
}

#[tokio::test]
async fn repeated_searches_reuse_one_download() {
    let fetcher = CountingFetcher::new(FIXTURE);
    let (service, _) = build_service(Arc::clone(&fetcher));

    service.search("DK0060534915").await.unwrap();
    service.search("SE0000108656").await.unwrap();
    service.search("NO0000000001").await.unwrap();
    assert_eq!(fetcher.call_count(), 1);
}

#[tokio::test]
async fn concurrent_cold_searches_download_once() {
    let fetcher = CountingFetcher::new(FIXTURE);
    let (service, _) = build_service(Arc::clone(&fetcher));
    let service = Arc::new(service);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(
            async move { service.search("DK0060534915").await },
        ));
    }
    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.matches.len(), 2);
    }
    assert_eq!(fetcher.call_count(), 1);
}

#[tokio::test]
async fn reload_downloads_a_fresh_copy() -> anyhow::Result<()> {
    let fetcher = CountingFetcher::new(FIXTURE);
    let (service, _) = build_service(Arc::clone(&fetcher));

    service.search("DK0060534915").await?;
    let reload = service.reload().await?;

    assert!(reload.ok);
    assert_eq!(reload.rows, 3);
    assert_eq!(reload.isin_column, Some(1));
    assert_eq!(fetcher.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn empty_isin_never_touches_the_network() {
    let fetcher = CountingFetcher::new(FIXTURE);
    let (service, _) = build_service(Arc::clone(&fetcher));

    let err = service.search("").await.unwrap_err();
    assert!(matches!(err, LookupError::MissingIsin));
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn unparseable_payload_fails_without_caching_anything() {
    let fetcher = CountingFetcher::new(b"this is not a workbook");
    let (service, _) = build_service(Arc::clone(&fetcher));

    assert!(service.search("DK0060534915").await.is_err());
    assert!(service.search("DK0060534915").await.is_err());
    // Nothing was cached after the first failure, so the second search
    // attempted its own download.
    assert_eq!(fetcher.call_count(), 2);
}
