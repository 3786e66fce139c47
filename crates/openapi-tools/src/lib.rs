//! OpenAPI -> MCP tooling for the sandbox MCP server.
//!
//! This crate holds the dynamic adapter core:
//! - a permissive model of the OpenAPI 3.x subset consumed for tool derivation,
//! - schema translation into typed field descriptors,
//! - derivation of one tool per path/method pair,
//! - the call dispatcher that proxies validated invocations as HTTP requests.
//!
//! The `sandbox-mcp` binary builds both its static and dynamic tool registries
//! on top of this crate.

pub mod config;
pub mod derive;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod runtime;
pub mod schema;
pub mod semantics;

/// Re-exported for tool table declarations in dependent crates.
pub use reqwest::Method;
