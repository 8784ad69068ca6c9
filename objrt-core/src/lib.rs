//! # Object Runtime Core
//!
//! Server and client machinery for browsing a job-scheduling cluster as a
//! path-addressed object hierarchy.
//!
//! ## Overview
//!
//! - **Cluster adapters**: the [`cluster::ClusterAdapter`] contract, a Slurm
//!   implementation that shells out to `sinfo`/`squeue`/`scontrol`, and a
//!   scripted in-memory adapter for tests
//! - **Path resolution**: [`resolver::PathResolver`] turns `/Root/P/J` into a
//!   snapshot with one adapter round trip per level walked
//! - **Wire protocol**: length-prefixed frames, the `GetObject` request and
//!   a versioned, validated response schema
//! - **Client**: [`client::RuntimeClient`] fetches snapshots and drills into
//!   children through the origin stamped on them
//!
//! ## Examples
//!
//! ```no_run
//! use objrt_core::client::RuntimeClient;
//!
//! async fn show_root() -> Result<(), objrt_core::RuntimeError> {
//!     let client = RuntimeClient::new();
//!     let quartz = client.fetch("127.0.0.1", 9100, "/Quartz").await?;
//!     for partition in quartz.child_titles() {
//!         println!("{partition}");
//!     }
//!     let general = client.drill_down(&quartz, "general").await?;
//!     println!("{} jobs", general.badge());
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// One-shot runtime client
pub mod client;

/// Cluster adapter contract and implementations
pub mod cluster;

/// Error taxonomy shared by server and client
pub mod error;

/// Framing, request messages and the response schema
pub mod protocol;

/// Root bindings and path resolution
pub mod resolver;

pub use client::RuntimeClient;
pub use cluster::{
    ClusterAdapter, ClusterQuery, ClusterQueryFailure, ClusterReply,
};
pub use error::{ErrorKind, Result, RuntimeError};
pub use resolver::{PathResolver, RootBinding, RootBindings};
