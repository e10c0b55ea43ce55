//! Command-line interface parsing for refcache
//!
//! This module handles parsing of CLI arguments using clap: the URL to
//! resolve, the cache freshness window, and an optional cache file override.

use clap::Parser;
use std::path::PathBuf;

/// Default freshness window for cached responses: one day
const DEFAULT_TTL_MS: u64 = 86_400_000;

/// Fetch an external JSON resource through the on-disk cache
#[derive(Parser, Debug)]
#[command(name = "refcache")]
#[command(about = "Fetch external JSON references through a disk-backed cache")]
#[command(version)]
pub struct Cli {
    /// URL of the JSON resource to fetch
    pub url: String,

    /// How long cached responses stay fresh, in milliseconds
    ///
    /// A ttl of 0 disables caching entirely: every invocation fetches from
    /// the network and nothing is written to disk.
    #[arg(long, default_value_t = DEFAULT_TTL_MS, value_name = "MS")]
    pub ttl: u64,

    /// Path of the cache file (defaults to the user cache directory)
    #[arg(long, value_name = "PATH")]
    pub cache_file: Option<PathBuf>,
}
