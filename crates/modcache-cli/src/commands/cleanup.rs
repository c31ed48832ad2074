use anyhow::Result;
use modcache_store::{Cache, DiskCache};

use crate::cli::CleanupArgs;
use crate::env::CliEnv;

pub async fn run(_args: CleanupArgs, env: CliEnv) -> Result<()> {
    let cache = DiskCache::new(&env.cache_dir);
    cache.cleanup().await?;
    tracing::info!(cache_dir = %env.cache_dir.display(), "cache cleanup sweep complete");
    Ok(())
}
