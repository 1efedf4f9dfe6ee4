//! SQLite backend for the RA duty tracker.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every write runs in a single
//! `BEGIN IMMEDIATE` transaction on that thread.

mod encode;
mod reconcile;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
