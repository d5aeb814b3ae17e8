//! # Cluebase DB
//!
//! Pooled access to the trivia database.
//!
//! This crate owns everything that touches SQL:
//! - Connection settings read from `DB_*` environment variables
//! - The shared connection pool
//! - The three query operations (topic listing, random clue batches,
//!   stat inserts)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod store;

pub use config::DbConfig;
pub use store::{Database, CLUE_BATCH_SIZE};
