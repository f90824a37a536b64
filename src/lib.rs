//! Aha! record resolution for AI agents.
//!
//! References are classified ([`reference`]), turned into GraphQL or REST
//! request shapes ([`request`]), executed by a [`client::Transport`] and
//! normalized by the [`service::RecordService`]. The [`mcp`] module exposes
//! the service as MCP tools.

pub mod client;
pub mod config;
pub mod error;
pub mod fields;
pub mod mcp;
pub mod models;
pub mod paginate;
pub mod reference;
pub mod request;
pub mod service;
