use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::SystemTime;

use modcache_verify::{Hasher, Sha256Hasher};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt, ReadBuf};

/// The stream returned by [`crate::Cache::get`]. Wraps the open file and
/// additionally exposes seek, the cached entry's expiration instant (reused
/// here as its last-modified value too, since `put` has already overwritten
/// the real write time with the expiry), and a strong content-hash entity
/// tag computed lazily on demand.
pub struct CacheStream {
    file: tokio::fs::File,
    size: u64,
    expires: SystemTime,
    path: PathBuf,
}

impl CacheStream {
    pub(crate) fn new(file: tokio::fs::File, size: u64, expires: SystemTime, path: PathBuf) -> Self {
        Self { file, size, expires, path }
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// The instant this entry's TTL expires. Also exposed as the entry's
    /// last-modified value, since the on-disk mtime has no other use left.
    pub fn expires_at(&self) -> SystemTime {
        self.expires
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Computes a strong entity tag by hashing the entire remaining stream.
    /// Consumes the current read position; call before any other reads, or
    /// on a freshly-opened stream.
    pub async fn etag(&mut self) -> io::Result<String> {
        let mut hasher = Sha256Hasher::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = self.file.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        self.file.rewind().await?;
        Ok(hex::encode(hasher.finalize()))
    }
}

impl AsyncRead for CacheStream {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().file).poll_read(cx, buf)
    }
}

impl AsyncSeek for CacheStream {
    fn start_seek(self: Pin<&mut Self>, position: io::SeekFrom) -> io::Result<()> {
        Pin::new(&mut self.get_mut().file).start_seek(position)
    }

    fn poll_complete(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<u64>> {
        Pin::new(&mut self.get_mut().file).poll_complete(cx)
    }
}
