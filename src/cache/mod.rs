//! Disk-backed fetch cache with expiry and cycle protection
//!
//! This module provides the `Cache` orchestrator that serves JSON resources
//! from a persistent store when fresh, fetches them over the network when
//! not, and fails fast on likely circular reference chains.

mod fetcher;

pub use fetcher::{Cache, CacheError};
