//! # Cluebase Server
//!
//! HTTP API server for the trivia backend.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod server;

pub use server::{Server, ServerConfig};
