//! SQLite backend for the Human Version Control journal.
//!
//! Provides [`SqliteStore`], a [`hvc_core::store::KeyValueStore`] kept in a
//! single SQLite file. The journal document lives in one row of the `kv`
//! table.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
