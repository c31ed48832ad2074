//! Command-line harness for the module proxy fetch pipeline: classifies a
//! proxy request path, runs it through a [`modcache_fetch::ModuleDriver`], and
//! materializes the result through the disk cache.

mod cli;
mod commands;
mod env;
mod fixture;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use env::CliEnv;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_target(false).init();

    let cli = Cli::parse();

    if let Commands::Completions(args) = cli.command {
        return commands::completions(args);
    }

    let env = CliEnv::new(cli.cache_dir, None)?;

    match cli.command {
        Commands::Fetch(args) => commands::fetch(args, env).await,
        Commands::Cleanup(args) => commands::cleanup(args, env).await,
        Commands::Completions(_) => unreachable!("handled above"),
    }
}
