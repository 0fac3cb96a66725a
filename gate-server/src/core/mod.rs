//! Core module - configuration, state, server and startup errors
//!
//! - [`Config`] - gateway configuration
//! - [`ServerState`] - shared read-only state handed to every request
//! - [`Server`] - HTTP server
//! - [`ServerError`] - startup errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
