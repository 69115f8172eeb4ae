//! Background cache population.
//!
//! GET responses are handed to a bounded queue and persisted by a dedicated
//! writer task, so the client never waits on the cache. A full queue drops
//! the write; a failed store is logged. Neither reaches the request path.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::cache::key::CacheKey;
use crate::cache::store::ResponseCache;
use crate::http::response::GatewayResponse;
use crate::observability::metrics;

enum WriteJob {
    Store {
        key: CacheKey,
        response: GatewayResponse,
    },
    Flush(oneshot::Sender<()>),
}

/// Handle to the writer task. Cloning shares the same queue.
#[derive(Clone)]
pub struct CacheWriter {
    tx: mpsc::Sender<WriteJob>,
}

impl CacheWriter {
    /// Spawn the writer task on the current runtime.
    pub fn spawn(cache: Arc<dyn ResponseCache>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(run_writer(cache, rx));
        (Self { tx }, handle)
    }

    /// Queue a response for persistence without waiting.
    pub fn enqueue(&self, key: CacheKey, response: GatewayResponse) {
        let reason = match self.tx.try_send(WriteJob::Store { key, response }) {
            Ok(()) => return,
            Err(mpsc::error::TrySendError::Full(_)) => "queue full",
            Err(mpsc::error::TrySendError::Closed(_)) => "writer stopped",
        };
        tracing::warn!(reason, "Dropping cache write");
        metrics::record_cache_write("dropped");
    }

    /// Wait until every write queued before this call has settled.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WriteJob::Flush(done_tx)).await.is_ok() {
            let _ = done_rx.await;
        }
    }
}

async fn run_writer(cache: Arc<dyn ResponseCache>, mut rx: mpsc::Receiver<WriteJob>) {
    tracing::debug!("Cache writer started");
    while let Some(job) = rx.recv().await {
        match job {
            WriteJob::Store { key, response } => match cache.store(&key, response).await {
                Ok(()) => {
                    tracing::debug!(key = %key, "Cached response");
                    metrics::record_cache_write("stored");
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Cache store failed");
                    metrics::record_cache_write("failed");
                }
            },
            WriteJob::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("Cache writer stopped");
}
