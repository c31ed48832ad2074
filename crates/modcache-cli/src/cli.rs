use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "modcache", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct Cli {
    /// Root directory of the disk cache. Defaults to `$MODCACHE_CACHE_DIR` or `~/.cache/modcache`.
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Classify a proxy request path and materialize its result.
    Fetch(FetchArgs),
    /// Run one cache cleanup sweep and exit.
    Cleanup(CleanupArgs),
    /// Print shell completion script for the given shell.
    Completions(CompletionsArgs),
}

#[derive(Debug, clap::Args)]
pub struct FetchArgs {
    /// Raw proxy request path, e.g. `example.com/foo/bar/@v/v1.0.0.info`.
    pub path: String,

    /// Scratch directory handed to the driver for download artifacts.
    #[arg(long)]
    pub temp_dir: Option<PathBuf>,

    /// Write the materialized stream here instead of stdout.
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Time-to-live applied when the result is written into the cache.
    #[arg(long, default_value_t = 3600)]
    pub ttl_secs: u64,

    /// Skip the cache and the real driver; serve from `--fixture` instead.
    #[arg(long)]
    pub offline: bool,

    /// JSON fixture file consulted when `--offline` is set.
    #[arg(long, requires = "offline")]
    pub fixture: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
pub struct CleanupArgs {}

#[derive(Debug, clap::Args)]
pub struct CompletionsArgs {
    pub shell: clap_complete::Shell,
}
