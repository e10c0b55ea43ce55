//! refcache - fetch external JSON references through a disk-backed cache
//!
//! Fetches one URL through the cache and pretty-prints the parsed JSON to
//! stdout. Diagnostics go to stderr and are controlled with `RUST_LOG`.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use refcache::cache::Cache;
use refcache::cli::Cli;
use refcache::store::FlatStore;
use refcache::transport::HttpTransport;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = match &cli.cache_file {
        Some(path) => FlatStore::load(path.clone()),
        None => FlatStore::open_default().ok_or("could not determine a cache directory")?,
    };

    let mut cache = Cache::new(store, HttpTransport::new(), cli.ttl);
    let body = cache.fetch(&cli.url).await?;

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
