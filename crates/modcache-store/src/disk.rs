use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use modcache_fs::{atomic_write, AtomicWriteOptions};

use crate::error::{CacheError, Result};
use crate::stream::CacheStream;
use crate::Cache;

/// A single root directory holding every cached artifact, keyed by the
/// proxy's slash-separated logical name.
#[derive(Debug, Clone)]
pub struct DiskCache {
    root: PathBuf,
}

impl DiskCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Translates a logical name into an OS-native path under `root`,
    /// rejecting anything that would escape it (`..`, absolute segments).
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() {
            return Err(CacheError::InvalidKey(name.to_string()));
        }

        let mut path = self.root.clone();
        for segment in name.split('/') {
            match Path::new(segment).components().next() {
                Some(Component::Normal(_)) => path.push(segment),
                _ => return Err(CacheError::InvalidKey(name.to_string())),
            }
        }
        Ok(path)
    }
}

#[async_trait]
impl Cache for DiskCache {
    async fn get(&self, name: &str) -> Result<CacheStream> {
        let path = self.resolve(name)?;

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(CacheError::NotFound),
            Err(e) => return Err(CacheError::Io { path, source: e }),
        };

        let expires = metadata.modified().map_err(|e| CacheError::Io { path: path.clone(), source: e })?;
        if expires <= SystemTime::now() {
            return Err(CacheError::NotFound);
        }

        let file = tokio::fs::File::open(&path).await.map_err(|e| CacheError::Io { path: path.clone(), source: e })?;

        Ok(CacheStream::new(file, metadata.len(), expires, path))
    }

    async fn put(&self, name: &str, content: &[u8], ttl: Duration) -> Result<()> {
        let path = self.resolve(name)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| CacheError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let _ = tokio::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o750)).await;
            }
        }

        let expires_at = SystemTime::now() + ttl;
        let content = content.to_vec();
        let write_path = path.clone();

        let written = tokio::task::spawn_blocking(move || atomic_write(&write_path, &content, AtomicWriteOptions::new().mtime(expires_at)))
            .await
            .map_err(|e| CacheError::Io {
                path: path.clone(),
                source: std::io::Error::other(e),
            })?;
        written?;
        Ok(())
    }

    /// Sweeps only the direct children of `root`. Artifacts live several
    /// directories deep (e.g. `example.com/foo/bar/@v/v1.0.0.info`), so a
    /// shallow pass rarely reaches an actual expired leaf — preserved
    /// deliberately rather than fixed.
    async fn cleanup(&self) -> Result<()> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(CacheError::Io { path: self.root.clone(), source: e }),
        };

        let now = SystemTime::now();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::Io { path: self.root.clone(), source: e })?
        {
            let path = entry.path();
            let Ok(metadata) = entry.metadata().await else { continue };
            let Ok(modified) = metadata.modified() else { continue };

            if modified <= now {
                let removal = if metadata.is_dir() {
                    tokio::fs::remove_dir_all(&path).await
                } else {
                    tokio::fs::remove_file(&path).await
                };
                if let Err(e) = removal {
                    tracing::warn!(path = %path.display(), error = %e, "cache cleanup failed to remove expired entry");
                }
            }
        }
        Ok(())
    }
}
