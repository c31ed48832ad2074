use std::time::Duration;

use anyhow::{Context, Result};
use modcache_fetch::{ModuleDriver, ProcessDriver};
use modcache_source::{classify, SumdbConfig};
use modcache_store::{Cache, DiskCache};
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

use crate::cli::FetchArgs;
use crate::env::CliEnv;
use crate::fixture;

pub async fn run(args: FetchArgs, env: CliEnv) -> Result<()> {
    let temp_dir = args.temp_dir.clone().unwrap_or_else(|| env.temp_dir.clone());
    let sumdb = SumdbConfig::from_env();
    let descriptor = classify(&args.path, &temp_dir, &sumdb).with_context(|| format!("classifying request path {:?}", args.path))?;

    let cache = DiskCache::new(&env.cache_dir);

    if let Ok(mut hit) = cache.get(&descriptor.name).await {
        tracing::debug!(name = %descriptor.name, "cache hit");
        let mut buf = Vec::new();
        hit.read_to_end(&mut buf).await.context("reading cached entry")?;
        return write_output(&buf, args.save.as_deref()).await;
    }

    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            cancel.cancel();
        })
    };

    let result = if args.offline {
        let driver = fixture::load_fake_driver(args.fixture.as_deref())?;
        run_driver(&driver, &descriptor, cancel.clone()).await?
    } else {
        let driver = ProcessDriver::new();
        run_driver(&driver, &descriptor, cancel.clone()).await?
    };
    watcher.abort();

    let mut stream = result.open().await.context("materializing fetch result")?;
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.context("reading materialized result")?;

    cache
        .put(&descriptor.name, &buf, Duration::from_secs(args.ttl_secs))
        .await
        .context("writing result into cache")?;

    write_output(&buf, args.save.as_deref()).await
}

async fn run_driver(driver: &dyn ModuleDriver, descriptor: &modcache_resource::FetchDescriptor, cancel: CancellationToken) -> Result<modcache_fetch::FetchResult> {
    driver.run(descriptor, cancel).await.context("running driver")
}

async fn write_output(buf: &[u8], save: Option<&std::path::Path>) -> Result<()> {
    match save {
        Some(path) => {
            tokio::fs::write(path, buf).await.with_context(|| format!("writing output to {}", path.display()))?;
        }
        None => {
            use tokio::io::AsyncWriteExt;
            tokio::io::stdout().write_all(buf).await.context("writing output to stdout")?;
        }
    }
    Ok(())
}
