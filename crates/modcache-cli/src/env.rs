use std::path::PathBuf;

use anyhow::{Context, Result};

/// Resolved process environment for the CLI: cache root and scratch
/// directory, in the same style as the host workspace's `SumdbConfig::from_env`.
#[derive(Debug, Clone)]
pub struct CliEnv {
    pub cache_dir: PathBuf,
    pub temp_dir: PathBuf,
}

impl CliEnv {
    pub fn new(cache_dir_override: Option<PathBuf>, temp_dir_override: Option<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir_override
            .or_else(|| std::env::var_os("MODCACHE_CACHE_DIR").map(PathBuf::from))
            .map(Ok)
            .unwrap_or_else(|| home::home_dir().map(|h| h.join(".cache/modcache")).context("failed to resolve home directory"))?;

        let temp_dir = temp_dir_override
            .or_else(|| std::env::var_os("MODCACHE_TEMP_DIR").map(PathBuf::from))
            .unwrap_or_else(std::env::temp_dir);

        Ok(Self { cache_dir, temp_dir })
    }
}
