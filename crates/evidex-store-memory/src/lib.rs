//! In-memory backend for the Evidex evidence repository.
//!
//! Holds a snapshot of cases, evidence and search annotations behind a
//! [`tokio::sync::RwLock`], optionally seeded from a JSON file. Nothing is
//! written back to disk.

mod seed;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use seed::{Seed, SearchAnnotation};
pub use store::MemoryStore;

#[cfg(test)]
mod tests;
