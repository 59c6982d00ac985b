//! Core types and engines for Human Version Control, a journal of personal
//! "versions".
//!
//! This crate owns the version model, the [`store::VersionStore`] and the
//! derived views over it (sorting, analytics, diffs, reflection). It is free
//! of database and terminal dependencies; durable storage plugs in through
//! [`store::KeyValueStore`].

pub mod analytics;
pub mod diff;
pub mod encode;
pub mod error;
pub mod memory;
pub mod reflect;
pub mod store;
pub mod version;
pub mod view;

pub use error::{Error, Result};
