//! Temporary artifact store.
//!
//! This crate provides:
//! - Collision-free name allocation inside a single shared directory
//! - Explicit retention of result files (exact-name set, not substrings)
//! - Best-effort reclamation sweeps and a destructive full purge
//! - Filename resolution and readiness lookup for the read-back endpoints

pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::{ArtifactHandle, ArtifactStore};
