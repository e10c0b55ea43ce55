//! refcache - a disk-backed cache for external JSON references
//!
//! Resolving external references (e.g., JSON schema documents referencing
//! each other by URL) means fetching the same resources over and over, and
//! cyclic references can make that recursion unbounded. This crate fetches
//! each distinct URL at most once per run while its cached copy is fresh,
//! persists responses across runs, and aborts resolution chains that revisit
//! the same URL more than ten times.

pub mod cache;
pub mod cli;
pub mod store;
pub mod transport;
