//! Content-addressed, expiring disk cache for fetched module artifacts.
//!
//! Keys are slash-separated logical names (e.g.
//! `example.com/foo/bar/@v/v1.0.0.info`), translated to OS-native paths under
//! a root directory. Expiration is encoded in-band as the cached file's
//! modification time, set via [`modcache_fs::atomic_write`]'s `mtime` option
//! — there is no separate index file.

mod disk;
mod error;
mod stream;
mod sweeper;

use std::time::Duration;

use async_trait::async_trait;

pub use disk::DiskCache;
pub use error::{CacheError, Result};
pub use stream::CacheStream;
pub use sweeper::spawn_sweeper;

/// A keyed byte store with expiring entries, backing repeated proxy requests.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, name: &str) -> Result<CacheStream>;
    async fn put(&self, name: &str, content: &[u8], ttl: Duration) -> Result<()>;
    async fn cleanup(&self) -> Result<()>;
}
