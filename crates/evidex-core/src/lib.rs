//! Core types and the evidence query engine for Evidex.
//!
//! This crate is deliberately free of HTTP and storage dependencies. The
//! query engine in [`query`] is pure: it borrows the records it is given and
//! returns the matching subset without touching anything else.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod case;
pub mod error;
pub mod evidence;
pub mod facets;
pub mod query;
pub mod repository;
pub mod session;

pub use error::{Error, Result};
pub use query::{Filterable, QuerySpec, filter};
