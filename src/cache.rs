use crate::error::Result;
use crate::snapshot::Snapshot;
use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use tracing::debug;

/// Produces a fresh snapshot from the remote source. Implemented by the full
/// download-and-parse pipeline in production and by canned fakes in tests.
#[async_trait]
pub trait SnapshotLoader: Send + Sync {
    async fn load(&self) -> Result<Snapshot>;
}

/// Holds at most one parsed snapshot and hands out shared references to it.
///
/// Reads against a populated cache take the `RwLock` briefly and clone an
/// `Arc`; no lock is held while callers scan rows. Population is serialized
/// behind `load_lock` so concurrent requests hitting an empty cache produce a
/// single download against the publisher's endpoint rather than one each; the
/// queued callers pick up the winner's snapshot on the re-check. A failed
/// load stores nothing, leaving the cache empty for the next attempt.
pub struct SnapshotCache {
    loader: Arc<dyn SnapshotLoader>,
    current: RwLock<Option<Arc<Snapshot>>>,
    load_lock: Mutex<()>,
}

impl SnapshotCache {
    pub fn new(loader: Arc<dyn SnapshotLoader>) -> Self {
        Self {
            loader,
            current: RwLock::new(None),
            load_lock: Mutex::new(()),
        }
    }

    /// Returns the held snapshot, loading one first if none is held.
    pub async fn get(&self) -> Result<Arc<Snapshot>> {
        if let Some(snapshot) = self.read_current() {
            return Ok(snapshot);
        }

        let _guard = self.load_lock.lock().await;

        // A caller queued ahead of us may have completed the load.
        if let Some(snapshot) = self.read_current() {
            return Ok(snapshot);
        }

        debug!("cache empty, running load pipeline");
        let snapshot = Arc::new(self.loader.load().await?);
        *self.current.write().unwrap() = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Drops the held snapshot; the next `get` reloads. Safe to race with an
    /// in-flight load: the load still installs its result, which is then the
    /// freshest data available anyway.
    pub fn invalidate(&self) {
        *self.current.write().unwrap() = None;
    }

    fn read_current(&self) -> Option<Arc<Snapshot>> {
        self.current.read().unwrap().clone()
    }
}
