//! # Object Runtime Server
//!
//! Accepts TCP connections, reads one framed `GetObject` request per
//! connection, resolves the requested path against the live cluster and
//! answers with one framed snapshot or error envelope.
//!
//! Connections share nothing but the read-only root table held by the
//! [`objrt_core::PathResolver`]; each one runs in its own task.

pub mod errors;
pub mod handler;
pub mod server;
pub mod startup;

pub use errors::ServerError;
pub use server::RuntimeServer;
