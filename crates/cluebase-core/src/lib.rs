//! # Cluebase Core
//!
//! Core types shared across the Cluebase trivia backend:
//! - Common error types
//! - Data transfer structures for clues and stat submissions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod model;

pub use error::{Error, Result};
pub use model::{Clue, StatEntry};
