use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The sentinel returned by `get` for a missing or expired entry.
    #[error("cache entry not found")]
    NotFound,

    #[error("invalid cache key: {0:?}")]
    InvalidKey(String),

    #[error("cache io error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Fs(#[from] modcache_fs::Error),
}

pub type Result<T> = std::result::Result<T, CacheError>;
