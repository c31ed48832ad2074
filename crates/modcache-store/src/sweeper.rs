use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::Cache;

/// Spawns an explicitly cancellable background task that calls
/// [`Cache::cleanup`] on a fixed interval. Cleanup errors are logged via
/// `tracing::warn!` and never stop the loop; only `cancel` firing does.
/// Unlike a detached `tokio::spawn` with no handle, the caller keeps both the
/// join handle and the cancellation token, so the sweeper can be shut down
/// deterministically at the end of its owning scope's lifetime.
pub fn spawn_sweeper<C>(cache: Arc<C>, interval: Duration, cancel: CancellationToken) -> JoinHandle<()>
where
    C: Cache + 'static,
{
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {
                    if let Err(e) = cache.cleanup().await {
                        tracing::warn!(error = %e, "cache cleanup sweep failed");
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiskCache;
    use std::time::Duration;
    use tempfile::tempdir;

    #[tokio::test(start_paused = true)]
    async fn sweeper_runs_cleanup_until_cancelled() {
        let dir = tempdir().unwrap();
        let cache = Arc::new(DiskCache::new(dir.path()));
        let cancel = CancellationToken::new();

        let handle = spawn_sweeper(cache.clone(), Duration::from_millis(10), cancel.clone());

        tokio::time::advance(Duration::from_millis(35)).await;
        cancel.cancel();
        handle.await.unwrap();
    }
}
