use async_trait::async_trait;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::error::{StudioError, StudioResult};
use crate::models::VideoRecord;

/// Where uploads and saves go. The studio ships with [`SimulatedBackend`]; a real
/// one slots in here without touching the handlers.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn upload(&self, file_name: &str, bytes: &[u8]) -> StudioResult<()>;
    async fn save_video(&self, video: &VideoRecord) -> StudioResult<()>;
}

/// Stands in for a remote service by sleeping for a fixed latency.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    pub upload_delay: Duration,
    pub save_delay: Duration,
}

#[async_trait]
impl Backend for SimulatedBackend {
    async fn upload(&self, file_name: &str, bytes: &[u8]) -> StudioResult<()> {
        tracing::debug!(file_name, size = bytes.len(), delay_ms = self.upload_delay.as_millis() as u64, "simulated upload");
        tokio::time::sleep(self.upload_delay).await;
        Ok(())
    }

    async fn save_video(&self, video: &VideoRecord) -> StudioResult<()> {
        tracing::debug!(video_id = %video.id, delay_ms = self.save_delay.as_millis() as u64, "simulated save");
        tokio::time::sleep(self.save_delay).await;
        Ok(())
    }
}

/// A spawned unit of work. Dropping it aborts the work, including while
/// [`PendingTask::join`] is being awaited.
#[derive(Debug)]
pub struct PendingTask<T> {
    handle: Option<JoinHandle<StudioResult<T>>>,
}

impl<T: Send + 'static> PendingTask<T> {
    pub fn spawn<F>(work: F) -> Self
    where
        F: Future<Output = StudioResult<T>> + Send + 'static,
    {
        Self { handle: Some(tokio::spawn(work)) }
    }

    /// Waits for the work. The handle stays owned by `self` until the task has
    /// finished, so a dropped `join` future still aborts it.
    pub async fn join(mut self) -> StudioResult<T> {
        let Some(handle) = self.handle.as_mut() else {
            return Err(StudioError::Cancelled);
        };
        let outcome = handle.await;
        self.handle = None;
        match outcome {
            Ok(res) => res,
            Err(e) if e.is_cancelled() => Err(StudioError::Cancelled),
            Err(e) => Err(StudioError::Internal(e.to_string())),
        }
    }
}

impl<T> Drop for PendingTask<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Counts work in flight, e.g. for an "uploading..." indicator.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicUsize>);

pub struct InFlightGuard(Arc<AtomicUsize>);

impl InFlight {
    pub fn enter(&self) -> InFlightGuard {
        self.0.fetch_add(1, Ordering::SeqCst);
        InFlightGuard(self.0.clone())
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
